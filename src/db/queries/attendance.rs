use super::{conversion_error, fmt_date, fmt_time, get_date, get_opt_time};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date: get_date(row, "date")?,
        check_in_time: get_opt_time(row, "check_in_time")?,
        check_out_time: get_opt_time(row, "check_out_time")?,
        work_hours: row.get("work_hours")?,
        overtime_hours: row.get("overtime_hours")?,
        status,
    })
}

pub fn load_record(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT * FROM attendance WHERE user_id = ?1 AND date = ?2",
            params![user_id, fmt_date(date)],
            map_row,
        )
        .optional()?;
    Ok(rec)
}

pub fn insert_record(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance
             (user_id, date, check_in_time, check_out_time, work_hours, overtime_hours, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            rec.user_id,
            fmt_date(&rec.date),
            rec.check_in_time.as_ref().map(fmt_time),
            rec.check_out_time.as_ref().map(fmt_time),
            rec.work_hours,
            rec.overtime_hours,
            rec.status.to_db_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update an attendance record (all fields except id, user and date)
pub fn update_record(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET check_in_time = ?1, check_out_time = ?2,
             work_hours = ?3, overtime_hours = ?4, status = ?5
         WHERE id = ?6",
        params![
            rec.check_in_time.as_ref().map(fmt_time),
            rec.check_out_time.as_ref().map(fmt_time),
            rec.work_hours,
            rec.overtime_hours,
            rec.status.to_db_str(),
            rec.id,
        ],
    )?;
    Ok(())
}

/// Attendance of every member of an organization within the bounds (inclusive).
/// `None` loads the whole history.
pub fn load_org_records(
    conn: &Connection,
    organization_id: i64,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceRecord>> {
    let (start, end) = match bounds {
        Some((s, e)) => (fmt_date(&s), fmt_date(&e)),
        None => ("0000-01-01".to_string(), "9999-12-31".to_string()),
    };

    let mut stmt = conn.prepare(
        "SELECT a.* FROM attendance a
         JOIN profiles p ON p.id = a.user_id
         WHERE p.organization_id = ?1
           AND a.date BETWEEN ?2 AND ?3
         ORDER BY a.date ASC, a.user_id ASC",
    )?;

    let rows = stmt.query_map(params![organization_id, start, end], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
