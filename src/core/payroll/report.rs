use super::hours::split_records;
use super::rates::{compute_pay, hourly_rate};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{attendance, organizations, profiles};
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::organization::OrgSettings;
use crate::models::profile::{Profile, Role};
use crate::utils::table::Table;
use crate::utils::{money, round2};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct PayrollLine {
    pub employee_id: i64,
    pub employee: String,
    pub role: Role,
    pub days_worked: usize,
    pub late_days: usize,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub hourly_rate: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PayrollTotals {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayrollReport {
    pub organization_id: i64,
    pub currency: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub lines: Vec<PayrollLine>,
    pub totals: PayrollTotals,
}

/// Build one line per employee. Employees without records are kept with
/// zero hours so non-attending staff stay visible.
pub fn build_lines(
    employees: &[Profile],
    records: &[AttendanceRecord],
    settings: &OrgSettings,
) -> Vec<PayrollLine> {
    let mut by_user: HashMap<i64, Vec<&AttendanceRecord>> = HashMap::new();
    for rec in records {
        by_user.entry(rec.user_id).or_default().push(rec);
    }

    employees
        .iter()
        .map(|emp| {
            let recs = by_user.get(&emp.id).map(Vec::as_slice).unwrap_or(&[]);
            let split = split_records(recs, settings);
            let regular_hours = round2(split.regular);
            let overtime_hours = round2(split.overtime);

            let rate = hourly_rate(emp.role, settings);
            let pay = compute_pay(regular_hours, overtime_hours, rate, settings);

            PayrollLine {
                employee_id: emp.id,
                employee: emp.full_name.clone(),
                role: emp.role,
                days_worked: recs
                    .iter()
                    .filter(|r| r.status != AttendanceStatus::Absent && r.work_hours > 0.0)
                    .count(),
                late_days: recs.iter().filter(|r| r.is_late()).count(),
                regular_hours,
                overtime_hours,
                hourly_rate: rate,
                regular_pay: pay.regular_pay,
                overtime_pay: pay.overtime_pay,
                gross_pay: pay.gross_pay,
                deductions: pay.deductions,
                net_pay: pay.net_pay,
            }
        })
        .collect()
}

pub fn totals(lines: &[PayrollLine]) -> PayrollTotals {
    let mut t = PayrollTotals::default();
    for l in lines {
        t.regular_hours += l.regular_hours;
        t.overtime_hours += l.overtime_hours;
        t.gross_pay += l.gross_pay;
        t.deductions += l.deductions;
        t.net_pay += l.net_pay;
    }
    PayrollTotals {
        regular_hours: round2(t.regular_hours),
        overtime_hours: round2(t.overtime_hours),
        gross_pay: round2(t.gross_pay),
        deductions: round2(t.deductions),
        net_pay: round2(t.net_pay),
    }
}

/// High-level business logic for the `payroll` command.
pub struct PayrollLogic;

impl PayrollLogic {
    pub fn generate(
        pool: &mut DbPool,
        organization_id: i64,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<PayrollReport> {
        let settings = organizations::load_settings(&pool.conn, organization_id)?;
        let employees = profiles::load_profiles(&pool.conn, organization_id)?;
        let records = attendance::load_org_records(&pool.conn, organization_id, bounds)?;

        let lines = build_lines(&employees, &records, &settings);
        let totals = totals(&lines);

        ttlog_quiet(
            &pool.conn,
            "payroll",
            &format!("org {organization_id}"),
            &format!("{} line(s), net {:.2}", lines.len(), totals.net_pay),
        );

        Ok(PayrollReport {
            organization_id,
            currency: settings.currency,
            period_start: bounds.map(|b| b.0),
            period_end: bounds.map(|b| b.1),
            lines,
            totals,
        })
    }

    pub fn print(report: &PayrollReport, symbol: &str) {
        let mut table = Table::new(vec![
            "ID", "Employee", "Role", "Days", "Late", "Reg h", "OT h", "Rate", "Gross", "Deduct",
            "Net",
        ]);

        for l in &report.lines {
            table.add_row(vec![
                l.employee_id.to_string(),
                l.employee.clone(),
                l.role.to_db_str().to_string(),
                l.days_worked.to_string(),
                l.late_days.to_string(),
                format!("{:.2}", l.regular_hours),
                format!("{:.2}", l.overtime_hours),
                money(l.hourly_rate, symbol),
                money(l.gross_pay, symbol),
                money(l.deductions, symbol),
                money(l.net_pay, symbol),
            ]);
        }

        let t = &report.totals;
        table.add_row(vec![
            String::new(),
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", t.regular_hours),
            format!("{:.2}", t.overtime_hours),
            String::new(),
            money(t.gross_pay, symbol),
            money(t.deductions, symbol),
            money(t.net_pay, symbol),
        ]);

        print!("{}", table.render());
    }
}
