use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn invalid(what: &str, raw: &str) -> AppError {
    AppError::InvalidDate(format!("{what}: '{raw}'"))
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    let first_next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)?
    };
    first_next.pred_opt().map(|d| d.day())
}

/// First and last day covered by one side of a range.
fn bounds_of(part: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let part = part.trim();
    match part.len() {
        // YYYY
        4 => {
            let y: i32 = part.parse().map_err(|_| invalid("invalid year", part))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid("invalid year", part))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid("invalid year", part))?;
            Ok((first, last))
        }
        // YYYY-MM
        7 => {
            let (ys, ms) = part.split_once('-').ok_or_else(|| invalid("invalid month", part))?;
            let y: i32 = ys.parse().map_err(|_| invalid("invalid year", part))?;
            let m: u32 = ms.parse().map_err(|_| invalid("invalid month", part))?;
            let last_day = month_last_day(y, m).ok_or_else(|| invalid("invalid month", part))?;
            let first = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| invalid("invalid month", part))?;
            let last = NaiveDate::from_ymd_opt(y, m, last_day)
                .ok_or_else(|| invalid("invalid month", part))?;
            Ok((first, last))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(part, "%Y-%m-%d")
                .map_err(|_| invalid("invalid date", part))?;
            Ok((d, d))
        }
        _ => Err(invalid("unsupported range format", part)),
    }
}

/// Parse a `--range` expression into inclusive date bounds.
///
/// Accepted: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or `A:B` where both sides
/// use the same one of those shapes.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match r.split_once(':') {
        Some((start, end)) => {
            if start.trim().len() != end.trim().len() {
                return Err(invalid("start and end must have the same format", r));
            }
            let (first, _) = bounds_of(start)?;
            let (_, last) = bounds_of(end)?;
            if last < first {
                return Err(invalid("range ends before it starts", r));
            }
            Ok((first, last))
        }
        None => bounds_of(r),
    }
}

/// `None` / `all` mean the whole history.
pub fn optional_range(r: Option<&str>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match r {
        None => Ok(None),
        Some(r) if r.eq_ignore_ascii_case("all") => Ok(None),
        Some(r) => parse_range(r).map(Some),
    }
}
