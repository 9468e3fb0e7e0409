//! Flat row shapes written by the exporters.

use crate::core::payroll::PayrollLine;
use crate::db::queries::fmt_time;
use crate::models::attendance::AttendanceRecord;
use crate::models::incident::Incident;
use serde::Serialize;
use std::collections::HashMap;

/// A record that can be written as one spreadsheet row.
///
/// CSV and JSON go through serde; XLSX uses `headers` + `to_row` so the
/// column order is the same everywhere.
pub trait ExportRow: Serialize {
    fn headers() -> Vec<&'static str>;
    fn to_row(&self) -> Vec<String>;
}

#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub id: i64,
    pub user_id: i64,
    pub employee: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub work_hours: f64,
    pub overtime_hours: f64,
    pub status: String,
}

impl AttendanceExport {
    pub fn from_records(
        records: &[AttendanceRecord],
        names: &HashMap<i64, String>,
    ) -> Vec<AttendanceExport> {
        records
            .iter()
            .map(|r| AttendanceExport {
                id: r.id,
                user_id: r.user_id,
                employee: names.get(&r.user_id).cloned().unwrap_or_default(),
                date: r.date.format("%Y-%m-%d").to_string(),
                check_in: r.check_in_time.as_ref().map(fmt_time).unwrap_or_default(),
                check_out: r.check_out_time.as_ref().map(fmt_time).unwrap_or_default(),
                work_hours: r.work_hours,
                overtime_hours: r.overtime_hours,
                status: r.status.to_db_str().to_string(),
            })
            .collect()
    }
}

impl ExportRow for AttendanceExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "user_id",
            "employee",
            "date",
            "check_in",
            "check_out",
            "work_hours",
            "overtime_hours",
            "status",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user_id.to_string(),
            self.employee.clone(),
            self.date.clone(),
            self.check_in.clone(),
            self.check_out.clone(),
            format!("{:.2}", self.work_hours),
            format!("{:.2}", self.overtime_hours),
            self.status.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PayrollExport {
    pub employee_id: i64,
    pub employee: String,
    pub role: String,
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

impl From<&PayrollLine> for PayrollExport {
    fn from(l: &PayrollLine) -> Self {
        PayrollExport {
            employee_id: l.employee_id,
            employee: l.employee.clone(),
            role: l.role.to_db_str().to_string(),
            days_worked: l.days_worked,
            late_days: l.late_days,
            regular_hours: l.regular_hours,
            overtime_hours: l.overtime_hours,
            hourly_rate: l.hourly_rate,
            regular_pay: l.regular_pay,
            overtime_pay: l.overtime_pay,
            gross_pay: l.gross_pay,
            deductions: l.deductions,
            net_pay: l.net_pay,
        }
    }
}

impl ExportRow for PayrollExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "employee_id",
            "employee",
            "role",
            "days_worked",
            "late_days",
            "regular_hours",
            "overtime_hours",
            "hourly_rate",
            "regular_pay",
            "overtime_pay",
            "gross_pay",
            "deductions",
            "net_pay",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.employee_id.to_string(),
            self.employee.clone(),
            self.role.clone(),
            self.days_worked.to_string(),
            self.late_days.to_string(),
            format!("{:.2}", self.regular_hours),
            format!("{:.2}", self.overtime_hours),
            format!("{:.2}", self.hourly_rate),
            format!("{:.2}", self.regular_pay),
            format!("{:.2}", self.overtime_pay),
            format!("{:.2}", self.gross_pay),
            format!("{:.2}", self.deductions),
            format!("{:.2}", self.net_pay),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct IncidentExport {
    pub id: i64,
    pub title: String,
    pub severity: String,
    pub status: String,
    pub occurrences: i64,
    pub affected_services: String,
    pub pattern: String,
    pub probable_cause: String,
    pub created_at: String,
    pub resolved_at: String,
}

impl From<&Incident> for IncidentExport {
    fn from(i: &Incident) -> Self {
        IncidentExport {
            id: i.id,
            title: i.title.clone(),
            severity: i.severity.to_string(),
            status: i.status.to_string(),
            occurrences: i.occurrences,
            affected_services: i.affected_services.iter().cloned().collect::<Vec<_>>().join(", "),
            pattern: i.pattern.clone(),
            probable_cause: i
                .ai_analysis
                .as_ref()
                .map(|a| a.probable_cause.clone())
                .unwrap_or_default(),
            created_at: i.created_at.clone(),
            resolved_at: i.resolved_at.clone().unwrap_or_default(),
        }
    }
}

impl ExportRow for IncidentExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "title",
            "severity",
            "status",
            "occurrences",
            "affected_services",
            "pattern",
            "probable_cause",
            "created_at",
            "resolved_at",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.severity.clone(),
            self.status.clone(),
            self.occurrences.to_string(),
            self.affected_services.clone(),
            self.pattern.clone(),
            self.probable_cause.clone(),
            self.created_at.clone(),
            self.resolved_at.clone(),
        ]
    }
}
