use crate::cli::parser::{AttendanceAction, Commands};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::core::notify::{NotificationEvent, Vars, notify_quiet};
use crate::db::queries::profiles;
use crate::errors::{AppError, AppResult};
use crate::export::optional_range;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::services::Services;
use crate::utils::date::{date_or_today, parse_date};
use crate::utils::time::{parse_time, time_or_now};
use std::collections::HashMap;

fn day_vars(name: String, rec: &AttendanceRecord, time: chrono::NaiveTime) -> Vars {
    let mut vars = Vars::new();
    vars.insert("name".into(), name);
    vars.insert("date".into(), rec.date.to_string());
    vars.insert("time".into(), time.format("%H:%M").to_string());
    vars
}

/// Handle the `attendance` command
pub fn handle(cmd: &Commands, cfg: &Config, services: &Services) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };
    let mut pool = super::open_pool(&cfg.database)?;
    let webhooks = services.webhooks.as_ref();

    match action {
        AttendanceAction::Checkin { member, date, time } => {
            let date = date_or_today(date.as_ref())?;
            let time = time_or_now(time.as_ref())?;
            let rec = AttendanceLogic::check_in(&mut pool, cfg.organization, *member, date, time)?;

            let name = profiles::load_member(&pool.conn, cfg.organization, *member)?.full_name;
            let vars = day_vars(name, &rec, time);
            let event = if rec.is_late() {
                NotificationEvent::LateArrival
            } else {
                NotificationEvent::CheckIn
            };
            notify_quiet(webhooks, &pool.conn, event, &vars);
        }

        AttendanceAction::Checkout { member, date, time } => {
            let date = date_or_today(date.as_ref())?;
            let time = time_or_now(time.as_ref())?;
            let rec = AttendanceLogic::check_out(&mut pool, cfg.organization, *member, date, time)?;

            let name = profiles::load_member(&pool.conn, cfg.organization, *member)?.full_name;
            let mut vars = day_vars(name, &rec, time);
            vars.insert("hours".into(), format!("{:.2}", rec.work_hours));
            notify_quiet(webhooks, &pool.conn, NotificationEvent::CheckOut, &vars);
        }

        AttendanceAction::Record {
            member,
            date,
            check_in,
            check_out,
            hours,
            overtime,
            status,
        } => {
            let check_in_time = check_in.as_deref().map(parse_time).transpose()?;
            let check_out_time = check_out.as_deref().map(parse_time).transpose()?;
            let status = match status {
                Some(s) => AttendanceStatus::from_db_str(s)
                    .ok_or_else(|| AppError::InvalidStatus(s.clone()))?,
                None => AttendanceStatus::Present,
            };

            AttendanceLogic::record(
                &mut pool,
                cfg.organization,
                AttendanceRecord {
                    id: 0,
                    user_id: *member,
                    date: parse_date(date)?,
                    check_in_time,
                    check_out_time,
                    work_hours: hours.unwrap_or(0.0),
                    overtime_hours: overtime.unwrap_or(0.0),
                    status,
                },
            )?;
        }

        AttendanceAction::List { range } => {
            let bounds = optional_range(range.as_deref())?;
            let records = AttendanceLogic::list(&mut pool, cfg.organization, bounds)?;
            let names: HashMap<i64, String> = profiles::load_profiles(&pool.conn, cfg.organization)?
                .into_iter()
                .map(|p| (p.id, p.full_name))
                .collect();
            AttendanceLogic::print(&records, &names);
        }
    }

    Ok(())
}
