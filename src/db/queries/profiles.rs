use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::profile::{Profile, Role};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Profile> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str)
        .ok_or_else(|| conversion_error(AppError::InvalidRole(role_str.clone())))?;

    Ok(Profile {
        id: row.get("id")?,
        organization_id: row.get("organization_id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        role,
    })
}

pub fn insert_profile(
    conn: &Connection,
    organization_id: i64,
    full_name: &str,
    email: &str,
    role: Role,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO profiles (organization_id, full_name, email, role)
         VALUES (?1, ?2, ?3, ?4)",
        params![organization_id, full_name, email, role.to_db_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_profile(conn: &Connection, id: i64) -> AppResult<Profile> {
    conn.query_row("SELECT * FROM profiles WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::not_found("Employee", id))
}

/// Profile of `id` when it belongs to the organization; other tenants'
/// profiles are reported as not found.
pub fn load_member(conn: &Connection, organization_id: i64, id: i64) -> AppResult<Profile> {
    conn.query_row(
        "SELECT * FROM profiles WHERE id = ?1 AND organization_id = ?2",
        params![id, organization_id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found("Employee", id))
}

/// Every profile of the organization, ordered by name.
pub fn load_profiles(conn: &Connection, organization_id: i64) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM profiles
         WHERE organization_id = ?1
         ORDER BY full_name ASC, id ASC",
    )?;

    let rows = stmt.query_map([organization_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
