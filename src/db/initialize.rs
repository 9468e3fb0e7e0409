use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine,
/// then makes sure the default organization exists.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    seed_default_organization(conn)?;
    Ok(())
}

fn seed_default_organization(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO organizations (id, name) VALUES (1, 'Default organization')",
        [],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO organization_settings (organization_id) VALUES (1)",
        [],
    )?;
    Ok(())
}
