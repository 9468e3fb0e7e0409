use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::payroll::PayrollLogic;
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic, PayrollExport, optional_range};
use crate::ui::messages::{header, info};

/// Handle the `payroll` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Payroll {
        range,
        format,
        file,
        force,
    } = cmd
    {
        let bounds = optional_range(range.as_deref())?;
        let mut pool = super::open_pool(&cfg.database)?;
        let report = PayrollLogic::generate(&mut pool, cfg.organization, bounds)?;

        match bounds {
            Some((start, end)) => header(format!("Payroll {} .. {} ({})", start, end, report.currency)),
            None => header(format!("Payroll, all records ({})", report.currency)),
        }

        if report.lines.is_empty() {
            info("No employees in this organization.");
            return Ok(());
        }
        PayrollLogic::print(&report, &cfg.currency_symbol);

        if let Some(file) = file {
            let rows: Vec<PayrollExport> = report.lines.iter().map(PayrollExport::from).collect();
            ExportLogic::export_payroll_lines(
                &rows,
                format.unwrap_or(ExportFormat::Csv),
                file,
                *force,
            )?;
        }
    }

    Ok(())
}
