//! Row mapping helpers and per-table query modules.

pub mod attendance;
pub mod forms;
pub mod incidents;
pub mod notifications;
pub mod organizations;
pub mod profiles;
pub mod routes;
pub mod visits;

use crate::errors::AppError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Row;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M";
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Wrap a domain parse error into the error type rusqlite row mappers expect.
pub(crate) fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn get_date(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, DATE_FMT).map_err(|_| conversion_error(AppError::InvalidDate(s)))
}

pub(crate) fn get_opt_date(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(col)?;
    match s {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, DATE_FMT)
            .map(Some)
            .map_err(|_| conversion_error(AppError::InvalidDate(s))),
    }
}

pub(crate) fn get_opt_time(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveTime>> {
    let s: Option<String> = row.get(col)?;
    match s {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveTime::parse_from_str(&s, TIME_FMT)
            .map(Some)
            .map_err(|_| conversion_error(AppError::InvalidTime(s))),
    }
}

pub(crate) fn get_datetime(row: &Row, col: &str) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(col)?;
    NaiveDateTime::parse_from_str(&s, DATETIME_FMT)
        .map_err(|_| conversion_error(AppError::InvalidDate(s)))
}

pub(crate) fn get_opt_datetime(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let s: Option<String> = row.get(col)?;
    match s {
        None => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FMT)
            .map(Some)
            .map_err(|_| conversion_error(AppError::InvalidDate(s))),
    }
}

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn fmt_time(t: &NaiveTime) -> String {
    t.format(TIME_FMT).to_string()
}

pub(crate) fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}
