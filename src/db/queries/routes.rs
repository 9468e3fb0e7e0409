use super::{conversion_error, fmt_date, get_opt_date};
use crate::errors::{AppError, AppResult};
use crate::models::route::{Outlet, Route, RouteAssignment, RouteStatus, Schedule, Stop};
use crate::models::weekday::SystemDay;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

// ---------------------------
// Outlets
// ---------------------------

fn map_outlet(row: &Row) -> rusqlite::Result<Outlet> {
    Ok(Outlet {
        id: row.get("id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
    })
}

pub fn insert_outlet(
    conn: &Connection,
    organization_id: i64,
    name: &str,
    address: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO outlets (organization_id, name, address, lat, lng)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![organization_id, name, address, lat, lng],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_outlet(conn: &Connection, id: i64) -> AppResult<Outlet> {
    conn.query_row("SELECT * FROM outlets WHERE id = ?1", [id], map_outlet)
        .optional()?
        .ok_or_else(|| AppError::not_found("Outlet", id))
}

pub fn load_outlets(conn: &Connection, organization_id: i64) -> AppResult<Vec<Outlet>> {
    let mut stmt =
        conn.prepare("SELECT * FROM outlets WHERE organization_id = ?1 ORDER BY name ASC")?;
    let rows = stmt.query_map([organization_id], map_outlet)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Routes and stops
// ---------------------------

/// Route columns only; `stops` is filled by [`load_stops`].
fn map_route(row: &Row) -> rusqlite::Result<Route> {
    let status_str: String = row.get("status")?;
    let status = RouteStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    Ok(Route {
        id: row.get("id")?,
        name: row.get("name")?,
        status,
        route_date: get_opt_date(row, "route_date")?,
        total_estimated_duration: row.get("total_estimated_duration")?,
        total_estimated_distance: row.get("total_estimated_distance")?,
        total_stops: row.get("total_stops")?,
        stops: Vec::new(),
    })
}

pub struct NewRoute<'a> {
    pub organization_id: i64,
    pub name: &'a str,
    pub status: RouteStatus,
    pub route_date: Option<NaiveDate>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
}

pub fn insert_route(conn: &Connection, r: &NewRoute) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO routes
             (organization_id, name, status, route_date,
              total_estimated_duration, total_estimated_distance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            r.organization_id,
            r.name,
            r.status.to_db_str(),
            r.route_date.as_ref().map(fmt_date),
            r.duration_minutes,
            r.distance_km,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Stops of a route ordered by `stop_order`, outlets joined in.
pub fn load_stops(conn: &Connection, route_id: i64) -> AppResult<Vec<Stop>> {
    let mut stmt = conn.prepare(
        "SELECT s.id AS stop_id, s.stop_order, s.estimated_duration,
                o.id, o.name, o.address, o.lat, o.lng
         FROM route_stops s
         JOIN outlets o ON o.id = s.outlet_id
         WHERE s.route_id = ?1
         ORDER BY s.stop_order ASC",
    )?;

    let rows = stmt.query_map([route_id], |row| {
        Ok(Stop {
            id: row.get("stop_id")?,
            stop_order: row.get("stop_order")?,
            estimated_duration: row.get("estimated_duration")?,
            outlet: map_outlet(row)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Like `load_route`, restricted to one organization.
pub fn load_org_route(conn: &Connection, organization_id: i64, id: i64) -> AppResult<Route> {
    let mut route = conn
        .query_row(
            "SELECT * FROM routes WHERE id = ?1 AND organization_id = ?2",
            params![id, organization_id],
            map_route,
        )
        .optional()?
        .ok_or_else(|| AppError::not_found("Route", id))?;
    route.stops = load_stops(conn, id)?;
    Ok(route)
}

pub fn load_route(conn: &Connection, id: i64) -> AppResult<Route> {
    let mut route = conn
        .query_row("SELECT * FROM routes WHERE id = ?1", [id], map_route)
        .optional()?
        .ok_or_else(|| AppError::not_found("Route", id))?;
    route.stops = load_stops(conn, id)?;
    Ok(route)
}

pub fn load_routes(conn: &Connection, organization_id: i64) -> AppResult<Vec<Route>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM routes
         WHERE organization_id = ?1
         ORDER BY route_date IS NULL, route_date ASC, name ASC",
    )?;
    let rows = stmt.query_map([organization_id], map_route)?;

    let mut out = Vec::new();
    for r in rows {
        let mut route = r?;
        route.stops = load_stops(conn, route.id)?;
        out.push(route);
    }
    Ok(out)
}

/// Append a stop at the end of the route and refresh `total_stops`.
/// Returns the assigned `stop_order`.
pub fn append_stop(
    conn: &Connection,
    route_id: i64,
    outlet_id: i64,
    estimated_duration: Option<f64>,
) -> AppResult<i64> {
    let tx = conn.unchecked_transaction()?;

    let next_order: i64 = tx.query_row(
        "SELECT COALESCE(MAX(stop_order), 0) + 1 FROM route_stops WHERE route_id = ?1",
        [route_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "INSERT INTO route_stops (route_id, outlet_id, stop_order, estimated_duration)
         VALUES (?1, ?2, ?3, ?4)",
        params![route_id, outlet_id, next_order, estimated_duration],
    )?;

    tx.execute(
        "UPDATE routes
         SET total_stops = (SELECT COUNT(*) FROM route_stops WHERE route_id = ?1)
         WHERE id = ?1",
        [route_id],
    )?;

    tx.commit()?;
    Ok(next_order)
}

pub fn update_route_status(conn: &Connection, route_id: i64, status: RouteStatus) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE routes SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), route_id],
    )?;
    if n == 0 {
        return Err(AppError::not_found("Route", route_id));
    }
    Ok(())
}

// ---------------------------
// Assignments
// ---------------------------

pub fn insert_assignment(
    conn: &Connection,
    route_id: i64,
    assignee_id: i64,
    schedule: &Schedule,
) -> AppResult<i64> {
    let (is_recurring, day, date) = match schedule {
        Schedule::Recurring(day) => (true, Some(day.number() as i64), None),
        Schedule::Dated(date) => (false, None, Some(fmt_date(date))),
        Schedule::RouteDate => (false, None, None),
    };

    conn.execute(
        "INSERT INTO route_assignments (route_id, assignee_id, is_recurring, day_of_week, assigned_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![route_id, assignee_id, is_recurring as i32, day, date],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_assignment(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM route_assignments WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::not_found("Assignment", id));
    }
    Ok(())
}

fn map_assignment_columns(row: &Row) -> rusqlite::Result<(i64, i64, i64, Schedule)> {
    let is_recurring = row.get::<_, i64>("is_recurring")? != 0;
    let day = match row.get::<_, Option<i64>>("day_of_week")? {
        Some(n) => Some(SystemDay::new(n).map_err(conversion_error)?),
        None => None,
    };
    let date = get_opt_date(row, "assigned_date")?;

    Ok((
        row.get("id")?,
        row.get("route_id")?,
        row.get("assignee_id")?,
        Schedule::from_columns(is_recurring, day, date),
    ))
}

/// Every assignment of a member, with its route (and stops) joined in.
pub fn load_assignments_for(conn: &Connection, assignee_id: i64) -> AppResult<Vec<RouteAssignment>> {
    let columns: Vec<(i64, i64, i64, Schedule)> = {
        let mut stmt = conn.prepare(
            "SELECT id, route_id, assignee_id, is_recurring, day_of_week, assigned_date
             FROM route_assignments
             WHERE assignee_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([assignee_id], map_assignment_columns)?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    let mut out = Vec::with_capacity(columns.len());
    for (id, route_id, assignee_id, schedule) in columns {
        out.push(RouteAssignment {
            id,
            route_id,
            assignee_id,
            schedule,
            route: load_route(conn, route_id)?,
        });
    }
    Ok(out)
}
