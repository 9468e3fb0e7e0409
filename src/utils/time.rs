//! Time utilities: parsing HH:MM, hour computations.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveTime, Timelike};

pub fn parse_time(t: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").map_err(|_| AppError::InvalidTime(t.to_string()))
}

/// Parse an optional CLI time, defaulting to the current minute.
pub fn time_or_now(input: Option<&String>) -> AppResult<NaiveTime> {
    match input {
        Some(s) => parse_time(s),
        None => {
            let now = Local::now().time();
            Ok(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now))
        }
    }
}

pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let duration = end - start;
    duration.num_minutes()
}

/// Hours between two times of the same day (negative if `end` is earlier).
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    minutes_between(start, end) as f64 / 60.0
}
