use super::{fmt_datetime, get_datetime, get_opt_datetime};
use crate::errors::{AppError, AppResult};
use crate::models::visit::OutletVisit;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<OutletVisit> {
    Ok(OutletVisit {
        id: row.get("id")?,
        outlet_id: row.get("outlet_id")?,
        user_id: row.get("user_id")?,
        check_in_time: get_datetime(row, "check_in_time")?,
        check_out_time: get_opt_datetime(row, "check_out_time")?,
        form_completed: row.get::<_, i64>("form_completed")? != 0,
        form_response_id: row.get("form_response_id")?,
    })
}

pub fn insert_visit(
    conn: &Connection,
    outlet_id: i64,
    user_id: i64,
    check_in: &NaiveDateTime,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO outlet_visits (outlet_id, user_id, check_in_time) VALUES (?1, ?2, ?3)",
        params![outlet_id, user_id, fmt_datetime(check_in)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_visit(conn: &Connection, id: i64) -> AppResult<OutletVisit> {
    conn.query_row("SELECT * FROM outlet_visits WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::not_found("Visit", id))
}

/// Close a visit after its form was submitted.
pub fn complete_visit(
    conn: &Connection,
    id: i64,
    check_out: &NaiveDateTime,
    form_response_id: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE outlet_visits
         SET check_out_time = ?1, form_completed = 1, form_response_id = ?2
         WHERE id = ?3",
        params![fmt_datetime(check_out), form_response_id, id],
    )?;
    Ok(())
}

pub fn load_visits(conn: &Connection, user_id: Option<i64>) -> AppResult<Vec<OutletVisit>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM outlet_visits
         WHERE (?1 IS NULL OR user_id = ?1)
         ORDER BY check_in_time DESC",
    )?;
    let rows = stmt.query_map([user_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
