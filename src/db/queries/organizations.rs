use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::organization::{OrgSettings, Organization, OvertimeMode};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_settings(row: &Row) -> rusqlite::Result<OrgSettings> {
    let mode: String = row.get("overtime_mode")?;
    let overtime_mode = OvertimeMode::from_db_str(&mode)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(mode.clone())))?;

    Ok(OrgSettings {
        organization_id: row.get("organization_id")?,
        currency: row.get("currency")?,
        member_rate: row.get("member_rate")?,
        manager_rate: row.get("manager_rate")?,
        admin_rate: row.get("admin_rate")?,
        overtime_multiplier: row.get("overtime_multiplier")?,
        overtime_threshold: row.get("overtime_threshold")?,
        overtime_mode,
        tax_rate: row.get("tax_rate")?,
        benefits_rate: row.get("benefits_rate")?,
        other_rate: row.get("other_rate")?,
    })
}

pub fn create_organization(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute("INSERT INTO organizations (name) VALUES (?1)", [name])?;
    let id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO organization_settings (organization_id) VALUES (?1)",
        [id],
    )?;
    Ok(id)
}

pub fn load_organization(conn: &Connection, id: i64) -> AppResult<Organization> {
    conn.query_row(
        "SELECT id, name FROM organizations WHERE id = ?1",
        [id],
        |row| {
            Ok(Organization {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| AppError::not_found("Organization", id))
}

/// Settings for an organization. A missing row yields the built-in defaults,
/// so payroll always has rates to work with.
pub fn load_settings(conn: &Connection, organization_id: i64) -> AppResult<OrgSettings> {
    let found = conn
        .query_row(
            "SELECT * FROM organization_settings WHERE organization_id = ?1",
            [organization_id],
            map_settings,
        )
        .optional()?;

    Ok(found.unwrap_or_else(|| OrgSettings::defaults_for(organization_id)))
}

pub fn save_settings(conn: &Connection, s: &OrgSettings) -> AppResult<()> {
    conn.execute(
        "INSERT INTO organization_settings (
             organization_id, currency, member_rate, manager_rate, admin_rate,
             overtime_multiplier, overtime_threshold, overtime_mode,
             tax_rate, benefits_rate, other_rate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(organization_id) DO UPDATE SET
             currency = excluded.currency,
             member_rate = excluded.member_rate,
             manager_rate = excluded.manager_rate,
             admin_rate = excluded.admin_rate,
             overtime_multiplier = excluded.overtime_multiplier,
             overtime_threshold = excluded.overtime_threshold,
             overtime_mode = excluded.overtime_mode,
             tax_rate = excluded.tax_rate,
             benefits_rate = excluded.benefits_rate,
             other_rate = excluded.other_rate",
        params![
            s.organization_id,
            s.currency,
            s.member_rate,
            s.manager_rate,
            s.admin_rate,
            s.overtime_multiplier,
            s.overtime_threshold,
            s.overtime_mode.to_db_str(),
            s.tax_rate,
            s.benefits_rate,
            s.other_rate,
        ],
    )?;
    Ok(())
}
