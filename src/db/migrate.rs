use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also stores the applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_organizations_and_people",
        description: "Created organizations, settings, profiles and attendance tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS organization_settings (
            organization_id     INTEGER PRIMARY KEY REFERENCES organizations(id) ON DELETE CASCADE,
            currency            TEXT NOT NULL DEFAULT 'USD',
            member_rate         REAL NOT NULL DEFAULT 15.0,
            manager_rate        REAL,
            admin_rate          REAL,
            overtime_multiplier REAL NOT NULL DEFAULT 1.5,
            overtime_threshold  REAL NOT NULL DEFAULT 40.0,
            overtime_mode       TEXT NOT NULL DEFAULT 'daily' CHECK(overtime_mode IN ('daily','weekly')),
            tax_rate            REAL NOT NULL DEFAULT 0.20,
            benefits_rate       REAL NOT NULL DEFAULT 0.05,
            other_rate          REAL NOT NULL DEFAULT 0.0
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
            full_name       TEXT NOT NULL,
            email           TEXT NOT NULL DEFAULT '',
            role            TEXT NOT NULL DEFAULT 'member' CHECK(role IN ('member','manager','admin')),
            created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            date            TEXT NOT NULL,
            check_in_time   TEXT,
            check_out_time  TEXT,
            work_hours      REAL NOT NULL DEFAULT 0,
            overtime_hours  REAL NOT NULL DEFAULT 0,
            status          TEXT NOT NULL DEFAULT 'present'
                            CHECK(status IN ('present','absent','late','half_day')),
            UNIQUE(user_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_profiles_org ON profiles(organization_id);
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    },
    Migration {
        version: "20250315_0002_routes_and_outlets",
        description: "Created outlets, routes, stops, assignments and visits tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS outlets (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
            name            TEXT NOT NULL,
            address         TEXT NOT NULL DEFAULT '',
            lat             REAL,
            lng             REAL
        );

        CREATE TABLE IF NOT EXISTS routes (
            id                       INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id          INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
            name                     TEXT NOT NULL,
            status                   TEXT NOT NULL DEFAULT 'planned'
                                     CHECK(status IN ('planned','active','completed','cancelled')),
            route_date               TEXT,
            total_estimated_duration REAL,
            total_estimated_distance REAL,
            total_stops              INTEGER NOT NULL DEFAULT 0,
            created_at               TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS route_stops (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            route_id           INTEGER NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
            outlet_id          INTEGER NOT NULL REFERENCES outlets(id),
            stop_order         INTEGER NOT NULL,
            estimated_duration REAL,
            UNIQUE(route_id, stop_order)
        );

        CREATE TABLE IF NOT EXISTS route_assignments (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            route_id      INTEGER NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
            assignee_id   INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            is_recurring  INTEGER NOT NULL DEFAULT 0,
            day_of_week   INTEGER CHECK(day_of_week BETWEEN 1 AND 7),
            assigned_date TEXT,
            created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS outlet_visits (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            outlet_id        INTEGER NOT NULL REFERENCES outlets(id),
            user_id          INTEGER NOT NULL REFERENCES profiles(id),
            check_in_time    TEXT NOT NULL,
            check_out_time   TEXT,
            form_completed   INTEGER NOT NULL DEFAULT 0,
            form_response_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_assignments_assignee ON route_assignments(assignee_id);
        CREATE INDEX IF NOT EXISTS idx_stops_route_order ON route_stops(route_id, stop_order);
        "#,
    },
    Migration {
        version: "20250402_0003_forms",
        description: "Created forms and form_responses tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS forms (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
            title           TEXT NOT NULL,
            definition      TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS form_responses (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            form_id      INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
            user_id      INTEGER NOT NULL REFERENCES profiles(id),
            outlet_id    INTEGER REFERENCES outlets(id),
            submitted_at TEXT NOT NULL,
            answers      TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250420_0004_incidents_and_notifications",
        description: "Created incidents and notifications tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            title             TEXT NOT NULL,
            severity          TEXT NOT NULL CHECK(severity IN ('low','medium','high','critical')),
            status            TEXT NOT NULL DEFAULT 'investigating'
                              CHECK(status IN ('investigating','identified','monitoring','resolved')),
            pattern           TEXT NOT NULL,
            occurrences       INTEGER NOT NULL DEFAULT 0,
            affected_services TEXT NOT NULL DEFAULT '[]',
            logs              TEXT NOT NULL DEFAULT '[]',
            ai_analysis       TEXT,
            created_at        TEXT NOT NULL,
            resolved_at       TEXT
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            event      TEXT NOT NULL,
            channel    TEXT NOT NULL,
            payload    TEXT NOT NULL,
            status     TEXT NOT NULL CHECK(status IN ('sent','failed')),
            error      TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_incidents_pattern ON incidents(pattern, status);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Versions not yet applied, in order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db(). Returns the number of migrations applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {}", m.version));
        applied += 1;
    }

    Ok(applied)
}
