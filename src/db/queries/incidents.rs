use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::incident::{Analysis, Incident, IncidentStatus, Severity};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;

fn map_row(row: &Row) -> rusqlite::Result<Incident> {
    let sev_str: String = row.get("severity")?;
    let severity = Severity::from_db_str(&sev_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(sev_str.clone())))?;

    let status_str: String = row.get("status")?;
    let status = IncidentStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    let services_raw: String = row.get("affected_services")?;
    let affected_services: BTreeSet<String> =
        serde_json::from_str(&services_raw).map_err(|e| conversion_error(AppError::Json(e)))?;

    let logs_raw: String = row.get("logs")?;
    let logs: Vec<String> =
        serde_json::from_str(&logs_raw).map_err(|e| conversion_error(AppError::Json(e)))?;

    let analysis_raw: Option<String> = row.get("ai_analysis")?;
    let ai_analysis: Option<Analysis> = match analysis_raw {
        Some(s) => Some(serde_json::from_str(&s).map_err(|e| conversion_error(AppError::Json(e)))?),
        None => None,
    };

    Ok(Incident {
        id: row.get("id")?,
        title: row.get("title")?,
        severity,
        status,
        pattern: row.get("pattern")?,
        occurrences: row.get("occurrences")?,
        affected_services,
        logs,
        ai_analysis,
        created_at: row.get("created_at")?,
        resolved_at: row.get("resolved_at")?,
    })
}

pub fn insert_incident(conn: &Connection, inc: &Incident) -> AppResult<i64> {
    let analysis = inc.ai_analysis.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "INSERT INTO incidents
             (title, severity, status, pattern, occurrences,
              affected_services, logs, ai_analysis, created_at, resolved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            inc.title,
            inc.severity.as_str(),
            inc.status.as_str(),
            inc.pattern,
            inc.occurrences,
            serde_json::to_string(&inc.affected_services)?,
            serde_json::to_string(&inc.logs)?,
            analysis,
            inc.created_at,
            inc.resolved_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_incident(conn: &Connection, inc: &Incident) -> AppResult<()> {
    let analysis = inc.ai_analysis.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "UPDATE incidents
         SET title = ?1, severity = ?2, status = ?3, occurrences = ?4,
             affected_services = ?5, logs = ?6, ai_analysis = ?7, resolved_at = ?8
         WHERE id = ?9",
        params![
            inc.title,
            inc.severity.as_str(),
            inc.status.as_str(),
            inc.occurrences,
            serde_json::to_string(&inc.affected_services)?,
            serde_json::to_string(&inc.logs)?,
            analysis,
            inc.resolved_at,
            inc.id,
        ],
    )?;
    Ok(())
}

pub fn load_incident(conn: &Connection, id: i64) -> AppResult<Incident> {
    conn.query_row("SELECT * FROM incidents WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::not_found("Incident", id))
}

/// The most recent incident for this pattern that is not resolved yet.
pub fn load_open_by_pattern(conn: &Connection, pattern: &str) -> AppResult<Option<Incident>> {
    let inc = conn
        .query_row(
            "SELECT * FROM incidents
             WHERE pattern = ?1 AND status != 'resolved'
             ORDER BY id DESC LIMIT 1",
            [pattern],
            map_row,
        )
        .optional()?;
    Ok(inc)
}

pub fn load_incidents(conn: &Connection, include_resolved: bool) -> AppResult<Vec<Incident>> {
    let sql = if include_resolved {
        "SELECT * FROM incidents ORDER BY id DESC"
    } else {
        "SELECT * FROM incidents WHERE status != 'resolved' ORDER BY id DESC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
