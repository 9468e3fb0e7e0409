use crate::cli::parser::{Commands, OutletAction, RouteAction};
use crate::config::Config;
use crate::core::notify::{NotificationEvent, Vars, notify_quiet};
use crate::core::routes::CostModel;
use crate::core::routes::planner::{RouteInput, RouteLogic};
use crate::db::queries::{profiles, routes};
use crate::errors::{AppError, AppResult};
use crate::models::route::{RouteStatus, Schedule};
use crate::models::weekday::SystemDay;
use crate::services::Services;
use crate::ui::messages::{header, info};
use crate::utils::date::{date_or_today, parse_date};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;

fn parse_status(s: &str) -> AppResult<RouteStatus> {
    RouteStatus::from_db_str(s).ok_or_else(|| AppError::InvalidStatus(s.to_string()))
}

/// Handle the `route` and `outlet` commands
pub fn handle(cmd: &Commands, cfg: &Config, services: &Services) -> AppResult<()> {
    let mut pool = super::open_pool(&cfg.database)?;
    let model = CostModel::from(&cfg.routes);

    match cmd {
        Commands::Outlet { action } => match action {
            OutletAction::Add {
                name,
                address,
                lat,
                lng,
            } => {
                RouteLogic::add_outlet(&mut pool, cfg.organization, name, address, *lat, *lng)?;
            }
            OutletAction::List => {
                let outlets = routes::load_outlets(&pool.conn, cfg.organization)?;
                if outlets.is_empty() {
                    info("No outlets.");
                    return Ok(());
                }
                let mut table = Table::new(vec!["ID", "Name", "Address", "Lat", "Lng"]);
                for o in outlets {
                    table.add_row(vec![
                        o.id.to_string(),
                        o.name,
                        o.address,
                        opt_or_dash(o.lat),
                        opt_or_dash(o.lng),
                    ]);
                }
                print!("{}", table.render());
            }
        },

        Commands::Route { action } => match action {
            RouteAction::Add {
                name,
                status,
                date,
                distance,
                duration,
            } => {
                let date = date.as_deref().map(parse_date).transpose()?;
                RouteLogic::add_route(
                    &mut pool,
                    cfg.organization,
                    &RouteInput {
                        name: name.as_str(),
                        status: parse_status(status)?,
                        date,
                        distance_km: *distance,
                        duration_minutes: *duration,
                    },
                )?;
            }
            RouteAction::Stop {
                route,
                outlet,
                duration,
            } => {
                RouteLogic::add_stop(&mut pool, *route, *outlet, *duration)?;
            }
            RouteAction::Status { route, status } => {
                RouteLogic::set_status(&mut pool, *route, parse_status(status)?)?;
            }
            RouteAction::Assign {
                route,
                member,
                day,
                date,
            } => {
                let schedule = match (day, date) {
                    (Some(d), _) => Schedule::Recurring(SystemDay::new(*d)?),
                    (None, Some(d)) => Schedule::Dated(parse_date(d)?),
                    (None, None) => Schedule::RouteDate,
                };
                RouteLogic::assign(&mut pool, cfg.organization, *route, *member, schedule)?;

                let r = routes::load_org_route(&pool.conn, cfg.organization, *route)?;
                let m = profiles::load_member(&pool.conn, cfg.organization, *member)?;
                let mut vars = Vars::new();
                vars.insert("name".into(), m.full_name);
                vars.insert("route".into(), r.name);
                vars.insert("schedule".into(), schedule.describe());
                notify_quiet(
                    services.webhooks.as_ref(),
                    &pool.conn,
                    NotificationEvent::RouteAssigned,
                    &vars,
                );
            }
            RouteAction::Unassign { assignment } => {
                RouteLogic::unassign(&mut pool, *assignment)?;
            }
            RouteAction::List => {
                let list = routes::load_routes(&pool.conn, cfg.organization)?;
                RouteLogic::print_routes(&list, &model, &cfg.currency_symbol);
            }
            RouteAction::Day { member, date } => {
                let date = date_or_today(date.as_ref())?;
                let m = profiles::load_member(&pool.conn, cfg.organization, *member)?;
                let list = RouteLogic::day_routes(&mut pool, *member, date)?;

                header(format!("{} - {} ({})", m.full_name, date, SystemDay::of(date)));
                RouteLogic::print_routes(&list, &model, &cfg.currency_symbol);
                for r in &list {
                    println!("{}:", r.name);
                    RouteLogic::print_stops(r);
                }
            }
            RouteAction::Week { member, date } => {
                let date = date_or_today(date.as_ref())?;
                let m = profiles::load_member(&pool.conn, cfg.organization, *member)?;
                let plan = RouteLogic::week_plan(&mut pool, *member, date)?;

                header(format!("{} - week of {}", m.full_name, date));
                RouteLogic::print_week(&plan, &model, &cfg.currency_symbol);
            }
        },

        _ => {}
    }

    Ok(())
}
