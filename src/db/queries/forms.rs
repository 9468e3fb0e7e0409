use super::{conversion_error, fmt_datetime, get_datetime};
use crate::errors::{AppError, AppResult};
use crate::models::form::{Answers, Form, FormDefinition, FormResponse};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_form(row: &Row) -> rusqlite::Result<Form> {
    let raw: String = row.get("definition")?;
    let definition: FormDefinition =
        serde_json::from_str(&raw).map_err(|e| conversion_error(AppError::Json(e)))?;

    Ok(Form {
        id: row.get("id")?,
        organization_id: row.get("organization_id")?,
        definition,
        created_at: row.get("created_at")?,
    })
}

fn map_response(row: &Row) -> rusqlite::Result<FormResponse> {
    let raw: String = row.get("answers")?;
    let answers: Answers =
        serde_json::from_str(&raw).map_err(|e| conversion_error(AppError::Json(e)))?;

    Ok(FormResponse {
        id: row.get("id")?,
        form_id: row.get("form_id")?,
        user_id: row.get("user_id")?,
        outlet_id: row.get("outlet_id")?,
        submitted_at: get_datetime(row, "submitted_at")?,
        answers,
    })
}

pub fn insert_form(
    conn: &Connection,
    organization_id: i64,
    definition: &FormDefinition,
) -> AppResult<i64> {
    let json = serde_json::to_string(definition)?;
    conn.execute(
        "INSERT INTO forms (organization_id, title, definition, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            organization_id,
            definition.title,
            json,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_form(conn: &Connection, id: i64) -> AppResult<Form> {
    conn.query_row("SELECT * FROM forms WHERE id = ?1", [id], map_form)
        .optional()?
        .ok_or_else(|| AppError::not_found("Form", id))
}

pub fn load_forms(conn: &Connection, organization_id: i64) -> AppResult<Vec<Form>> {
    let mut stmt = conn.prepare("SELECT * FROM forms WHERE organization_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map([organization_id], map_form)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_response(
    conn: &Connection,
    form_id: i64,
    user_id: i64,
    outlet_id: Option<i64>,
    submitted_at: &NaiveDateTime,
    answers: &Answers,
) -> AppResult<i64> {
    let json = serde_json::to_string(answers)?;
    conn.execute(
        "INSERT INTO form_responses (form_id, user_id, outlet_id, submitted_at, answers)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![form_id, user_id, outlet_id, fmt_datetime(submitted_at), json],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_responses(conn: &Connection, form_id: i64) -> AppResult<Vec<FormResponse>> {
    let mut stmt =
        conn.prepare("SELECT * FROM form_responses WHERE form_id = ?1 ORDER BY submitted_at")?;
    let rows = stmt.query_map([form_id], map_response)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
