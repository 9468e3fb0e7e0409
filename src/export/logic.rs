use crate::core::payroll::PayrollLogic;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{attendance, incidents, profiles};
use crate::errors::AppResult;
use crate::export::fs_utils::{ensure_absolute, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{AttendanceExport, ExportRow, IncidentExport, PayrollExport};
use crate::export::range::optional_range;
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportDataset, ExportFormat};
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

/// High-level business logic for the `export` command.
pub struct ExportLogic;

pub struct ExportRequest<'a> {
    pub dataset: ExportDataset,
    pub format: ExportFormat,
    pub file: &'a str,
    /// `None`, `all`, or a `--range` expression.
    pub range: Option<&'a str>,
    pub force: bool,
}

impl ExportLogic {
    /// Returns the number of rows written.
    pub fn export(pool: &mut DbPool, organization_id: i64, req: &ExportRequest) -> AppResult<usize> {
        let path = Path::new(req.file);
        ensure_absolute(path)?;
        let bounds = optional_range(req.range)?;
        ensure_writable(path, req.force)?;

        let written = match req.dataset {
            ExportDataset::Attendance => {
                let names: HashMap<i64, String> = profiles::load_profiles(&pool.conn, organization_id)?
                    .into_iter()
                    .map(|p| (p.id, p.full_name))
                    .collect();
                let records = attendance::load_org_records(&pool.conn, organization_id, bounds)?;
                let rows = AttendanceExport::from_records(&records, &names);
                write_rows(&rows, req.format, "Attendance", path)?
            }
            ExportDataset::Payroll => {
                let report = PayrollLogic::generate(pool, organization_id, bounds)?;
                let rows: Vec<PayrollExport> = report.lines.iter().map(PayrollExport::from).collect();
                write_rows(&rows, req.format, "Payroll", path)?
            }
            ExportDataset::Incidents => {
                let list = incidents::load_incidents(&pool.conn, true)?;
                let rows: Vec<IncidentExport> = list
                    .iter()
                    .filter(|i| within(bounds, &i.created_at))
                    .map(IncidentExport::from)
                    .collect();
                write_rows(&rows, req.format, "Incidents", path)?
            }
        };

        ttlog_quiet(
            &pool.conn,
            "export",
            req.dataset.as_str(),
            &format!("{} row(s) as {} to {}", written, req.format.as_str(), path.display()),
        );
        Ok(written)
    }

    /// Write an already-built payroll report (used by `payroll --file`).
    pub fn export_payroll_lines(
        rows: &[PayrollExport],
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_absolute(path)?;
        ensure_writable(path, force)?;
        write_rows(rows, format, "Payroll", path)
    }
}

/// Incident timestamps start with the `YYYY-MM-DD` date.
fn within(bounds: Option<(NaiveDate, NaiveDate)>, timestamp: &str) -> bool {
    let Some((start, end)) = bounds else {
        return true;
    };
    timestamp
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .is_some_and(|d| d >= start && d <= end)
}

fn write_rows<T: ExportRow>(
    rows: &[T],
    format: ExportFormat,
    sheet: &str,
    path: &Path,
) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No rows found for the selected range; writing an empty file.");
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
        ExportFormat::Xlsx => export_xlsx(rows, sheet, path)?,
    }
    Ok(rows.len())
}
