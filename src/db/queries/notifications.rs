use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRow {
    pub id: i64,
    pub event: String,
    pub channel: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: String,
}

/// Record the outcome of an outbound message (webhook or email).
pub fn record(
    conn: &Connection,
    event: &str,
    channel: &str,
    payload: &str,
    outcome: Result<(), &str>,
) -> AppResult<i64> {
    let (status, error) = match outcome {
        Ok(()) => ("sent", None),
        Err(e) => ("failed", Some(e)),
    };

    conn.execute(
        "INSERT INTO notifications (event, channel, payload, status, error, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event,
            channel,
            payload,
            status,
            error,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_recent(conn: &Connection, limit: usize) -> AppResult<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, event, channel, status, error, created_at
         FROM notifications ORDER BY id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit as i64], |row| {
        Ok(NotificationRow {
            id: row.get(0)?,
            event: row.get(1)?,
            channel: row.get(2)?,
            status: row.get(3)?,
            error: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
