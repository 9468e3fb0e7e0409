use super::cost::{CostModel, WeeklyStats};
use super::resolver::{DayPlan, resolve_day_routes, resolve_week};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{profiles, routes};
use crate::errors::AppResult;
use crate::models::route::{Route, RouteStatus, Schedule};
use crate::models::weekday::SystemDay;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;
use crate::utils::{money, round2};
use chrono::NaiveDate;

/// High-level business logic for the `route` and `outlet` commands.
pub struct RouteLogic;

pub struct RouteInput<'a> {
    pub name: &'a str,
    pub status: RouteStatus,
    pub date: Option<NaiveDate>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
}

impl RouteLogic {
    pub fn add_outlet(
        pool: &mut DbPool,
        organization_id: i64,
        name: &str,
        address: &str,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> AppResult<i64> {
        let id = routes::insert_outlet(&pool.conn, organization_id, name, address, lat, lng)?;
        ttlog_quiet(&pool.conn, "outlet_add", &format!("outlet {id}"), name);
        success(format!("Outlet #{} '{}' created.", id, name));
        Ok(id)
    }

    pub fn add_route(pool: &mut DbPool, organization_id: i64, input: &RouteInput) -> AppResult<i64> {
        let id = routes::insert_route(
            &pool.conn,
            &routes::NewRoute {
                organization_id,
                name: input.name,
                status: input.status,
                route_date: input.date,
                duration_minutes: input.duration_minutes,
                distance_km: input.distance_km,
            },
        )?;
        ttlog_quiet(&pool.conn, "route_add", &format!("route {id}"), input.name);
        success(format!("Route #{} '{}' created.", id, input.name));
        Ok(id)
    }

    pub fn add_stop(
        pool: &mut DbPool,
        route_id: i64,
        outlet_id: i64,
        estimated_duration: Option<f64>,
    ) -> AppResult<i64> {
        // Fail early with a readable error on unknown ids.
        routes::load_route(&pool.conn, route_id)?;
        let outlet = routes::load_outlet(&pool.conn, outlet_id)?;

        let order = routes::append_stop(&pool.conn, route_id, outlet_id, estimated_duration)?;
        ttlog_quiet(
            &pool.conn,
            "route_stop",
            &format!("route {route_id}"),
            &format!("stop {order}: {}", outlet.name),
        );
        success(format!(
            "Stop {} added to route #{} ({}).",
            order, route_id, outlet.name
        ));
        Ok(order)
    }

    pub fn set_status(pool: &mut DbPool, route_id: i64, status: RouteStatus) -> AppResult<()> {
        routes::update_route_status(&pool.conn, route_id, status)?;
        ttlog_quiet(
            &pool.conn,
            "route_status",
            &format!("route {route_id}"),
            status.to_db_str(),
        );
        success(format!("Route #{} is now {}.", route_id, status.to_db_str()));
        Ok(())
    }

    /// Route and member must both belong to `organization_id`.
    pub fn assign(
        pool: &mut DbPool,
        organization_id: i64,
        route_id: i64,
        member_id: i64,
        schedule: Schedule,
    ) -> AppResult<i64> {
        let route = routes::load_org_route(&pool.conn, organization_id, route_id)?;
        let member = profiles::load_member(&pool.conn, organization_id, member_id)?;

        let id = routes::insert_assignment(&pool.conn, route_id, member_id, &schedule)?;
        ttlog_quiet(
            &pool.conn,
            "route_assign",
            &format!("route {route_id}"),
            &format!("{} {}", member.full_name, schedule.describe()),
        );
        success(format!(
            "Route '{}' assigned to {} ({}).",
            route.name,
            member.full_name,
            schedule.describe()
        ));
        Ok(id)
    }

    pub fn unassign(pool: &mut DbPool, assignment_id: i64) -> AppResult<()> {
        routes::delete_assignment(&pool.conn, assignment_id)?;
        ttlog_quiet(
            &pool.conn,
            "route_unassign",
            &format!("assignment {assignment_id}"),
            "Assignment removed",
        );
        success(format!("Assignment #{} removed.", assignment_id));
        Ok(())
    }

    pub fn day_routes(pool: &mut DbPool, member_id: i64, date: NaiveDate) -> AppResult<Vec<Route>> {
        let assignments = routes::load_assignments_for(&pool.conn, member_id)?;
        Ok(resolve_day_routes(&assignments, SystemDay::of(date), date))
    }

    pub fn week_plan(pool: &mut DbPool, member_id: i64, date: NaiveDate) -> AppResult<Vec<DayPlan>> {
        let assignments = routes::load_assignments_for(&pool.conn, member_id)?;
        Ok(resolve_week(&assignments, date))
    }

    pub fn print_routes(routes: &[Route], model: &CostModel, currency: &str) {
        if routes.is_empty() {
            info("No routes.");
            return;
        }

        let mut table = Table::new(vec![
            "ID", "Name", "Status", "Date", "Stops", "Km", "Min", "Fuel", "Labor", "Total",
        ]);
        for r in routes {
            let cost = model.route_cost(r);
            table.add_row(vec![
                r.id.to_string(),
                r.name.clone(),
                r.status.to_db_str().to_string(),
                opt_or_dash(r.route_date),
                r.total_stops.to_string(),
                opt_or_dash(r.total_estimated_distance),
                opt_or_dash(r.total_estimated_duration),
                money(round2(cost.fuel), currency),
                money(round2(cost.labor), currency),
                money(round2(cost.total), currency),
            ]);
        }
        print!("{}", table.render());
    }

    pub fn print_stops(route: &Route) {
        if route.stops.is_empty() {
            println!("   {GREY}(no stops){RESET}");
            return;
        }
        for s in &route.stops {
            println!(
                "   {:>2}. {} {}{}{} ({} min)",
                s.stop_order,
                s.outlet.name,
                GREY,
                s.outlet.address,
                RESET,
                opt_or_dash(s.estimated_duration)
            );
        }
    }

    pub fn print_week(plan: &[DayPlan], model: &CostModel, currency: &str) {
        for day in plan {
            let names: Vec<String> = day.routes.iter().map(|r| r.name.clone()).collect();
            let label = if names.is_empty() {
                format!("{GREY}-{RESET}")
            } else {
                names.join(", ")
            };
            println!("{} {}  {}", day.day.short_name(), day.date, label);
        }

        let stats = WeeklyStats::from_week(plan, model);
        println!();
        println!("Routes:             {}", stats.route_count);
        println!("Stops:              {}", stats.total_stops);
        println!("Avg stops/route:    {:.2}", stats.average_stops_per_route);
        println!("Distance:           {:.2} km", stats.total_distance);
        println!("Duration:           {:.0} min", stats.total_duration);
        println!("Fuel cost:          {}", money(stats.fuel_cost, currency));
        println!("Labor cost:         {}", money(stats.labor_cost, currency));
        println!("Total cost:         {}", money(stats.total_cost, currency));
    }
}
