use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{attendance, profiles};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, is_late_check_in};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_attendance, colorize_optional};
use crate::utils::formatting::opt_or_dash;
use crate::utils::round2;
use crate::utils::table::Table;
use crate::utils::time::hours_between;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

/// Fewer worked hours than this turn a day into a half day at check-out.
pub const HALF_DAY_HOURS: f64 = 4.0;

/// High-level business logic for the `attendance` command.
pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Open the (user, date) record. Late when after 09:00.
    pub fn check_in(
        pool: &mut DbPool,
        organization_id: i64,
        user_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<AttendanceRecord> {
        let profile = profiles::load_member(&pool.conn, organization_id, user_id)?;

        if let Some(existing) = attendance::load_record(&pool.conn, user_id, &date)? {
            return Err(AppError::Attendance(format!(
                "{} already has an attendance record for {} ({})",
                profile.full_name,
                date,
                existing.status.to_db_str()
            )));
        }

        let status = if is_late_check_in(time) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };

        let mut rec = AttendanceRecord {
            id: 0,
            user_id,
            date,
            check_in_time: Some(time),
            check_out_time: None,
            work_hours: 0.0,
            overtime_hours: 0.0,
            status,
        };
        rec.id = attendance::insert_record(&pool.conn, &rec)?;

        ttlog_quiet(
            &pool.conn,
            "check_in",
            &format!("user {user_id}"),
            &format!("{} {}", date, time.format("%H:%M")),
        );

        if status == AttendanceStatus::Late {
            warning(format!(
                "{} checked in late at {}.",
                profile.full_name,
                time.format("%H:%M")
            ));
        } else {
            success(format!(
                "{} checked in at {}.",
                profile.full_name,
                time.format("%H:%M")
            ));
        }

        Ok(rec)
    }

    /// Close the day: store check-out time and worked hours.
    pub fn check_out(
        pool: &mut DbPool,
        organization_id: i64,
        user_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<AttendanceRecord> {
        let profile = profiles::load_member(&pool.conn, organization_id, user_id)?;

        let mut rec = attendance::load_record(&pool.conn, user_id, &date)?.ok_or_else(|| {
            AppError::Attendance(format!(
                "{} has not checked in on {}",
                profile.full_name, date
            ))
        })?;

        let check_in = rec.check_in_time.ok_or_else(|| {
            AppError::Attendance(format!("Record for {} has no check-in time", date))
        })?;

        if rec.check_out_time.is_some() {
            return Err(AppError::Attendance(format!(
                "{} already checked out on {}",
                profile.full_name, date
            )));
        }

        if time <= check_in {
            return Err(AppError::InvalidTime(format!(
                "check-out {} is not after check-in {}",
                time.format("%H:%M"),
                check_in.format("%H:%M")
            )));
        }

        rec.check_out_time = Some(time);
        rec.work_hours = round2(hours_between(check_in, time));
        if rec.work_hours < HALF_DAY_HOURS {
            rec.status = AttendanceStatus::HalfDay;
        }

        attendance::update_record(&pool.conn, &rec)?;

        ttlog_quiet(
            &pool.conn,
            "check_out",
            &format!("user {user_id}"),
            &format!("{} {} ({:.2}h)", date, time.format("%H:%M"), rec.work_hours),
        );
        success(format!(
            "{} checked out at {} after {:.2}h.",
            profile.full_name,
            time.format("%H:%M"),
            rec.work_hours
        ));

        Ok(rec)
    }

    /// Insert or overwrite a full record (imports and corrections).
    pub fn record(
        pool: &mut DbPool,
        organization_id: i64,
        mut rec: AttendanceRecord,
    ) -> AppResult<AttendanceRecord> {
        profiles::load_member(&pool.conn, organization_id, rec.user_id)?;

        if let (Some(i), Some(o)) = (rec.check_in_time, rec.check_out_time)
            && rec.work_hours == 0.0
        {
            rec.work_hours = round2(hours_between(i, o).max(0.0));
        }

        match attendance::load_record(&pool.conn, rec.user_id, &rec.date)? {
            Some(existing) => {
                rec.id = existing.id;
                attendance::update_record(&pool.conn, &rec)?;
            }
            None => {
                rec.id = attendance::insert_record(&pool.conn, &rec)?;
            }
        }

        ttlog_quiet(
            &pool.conn,
            "attendance_record",
            &format!("user {}", rec.user_id),
            &format!(
                "{} {} {:.2}h (+{:.2}h overtime)",
                rec.date,
                rec.status.to_db_str(),
                rec.work_hours,
                rec.overtime_hours
            ),
        );
        success(format!(
            "Attendance stored for user #{} on {}.",
            rec.user_id, rec.date
        ));
        Ok(rec)
    }

    pub fn list(
        pool: &mut DbPool,
        organization_id: i64,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        attendance::load_org_records(&pool.conn, organization_id, bounds)
    }

    pub fn print(records: &[AttendanceRecord], names: &HashMap<i64, String>) {
        if records.is_empty() {
            info("No attendance records.");
            return;
        }

        let mut table = Table::new(vec!["Date", "Employee", "In", "Out", "Hours", "OT", "Status"]);
        for r in records {
            table.add_row(vec![
                r.date.to_string(),
                names
                    .get(&r.user_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", r.user_id)),
                colorize_optional(&opt_or_dash(r.check_in_time.map(|t| t.format("%H:%M")))),
                colorize_optional(&opt_or_dash(r.check_out_time.map(|t| t.format("%H:%M")))),
                format!("{:.2}", r.work_hours),
                format!("{:.2}", r.overtime_hours),
                format!(
                    "{}{}{}",
                    color_for_attendance(r.status),
                    r.status.to_db_str(),
                    RESET
                ),
            ]);
        }
        print!("{}", table.render());
    }
}
