//! File exports of attendance, payroll and incident data.

mod excel_date;
mod fs_utils;
mod json_csv;
pub mod logic;
pub mod model;
pub mod range;
mod xlsx;

pub use json_csv::write_csv;
pub use logic::{ExportLogic, ExportRequest};
pub use model::{AttendanceExport, ExportRow, IncidentExport, PayrollExport};
pub use range::{optional_range, parse_range};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportDataset {
    Attendance,
    Payroll,
    Incidents,
}

impl ExportDataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportDataset::Attendance => "attendance",
            ExportDataset::Payroll => "payroll",
            ExportDataset::Incidents => "incidents",
        }
    }
}
