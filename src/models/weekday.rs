use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Day of the week numbered Monday-first: 1 = Monday .. 7 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SystemDay(u8);

impl SystemDay {
    pub const MONDAY: SystemDay = SystemDay(1);
    pub const SUNDAY: SystemDay = SystemDay(7);

    pub fn new(n: i64) -> AppResult<Self> {
        if (1..=7).contains(&n) {
            Ok(SystemDay(n as u8))
        } else {
            Err(AppError::InvalidWeekday(n))
        }
    }

    /// Convert a native Sunday-first index (0 = Sunday .. 6 = Saturday).
    /// Sunday becomes 7, Monday..Saturday keep their number.
    pub fn from_native(n: i64) -> AppResult<Self> {
        match n {
            0 => Ok(SystemDay(7)),
            1..=6 => Ok(SystemDay(n as u8)),
            other => Err(AppError::InvalidWeekday(other)),
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        // number_from_monday is already 1..=7 Monday-first
        SystemDay(date.weekday().number_from_monday() as u8)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Sunday",
        }
    }

    pub fn short_name(&self) -> &'static str {
        &self.name()[..3]
    }

    pub fn all() -> impl Iterator<Item = SystemDay> {
        (1..=7u8).map(SystemDay)
    }
}

impl fmt::Display for SystemDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = SystemDay::of(date).number() as i64 - 1;
    date - Duration::days(offset)
}

/// The seven dates (Monday..Sunday) of the week containing `date`.
pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = week_start(date);
    (0..7).map(|i| monday + Duration::days(i)).collect()
}
