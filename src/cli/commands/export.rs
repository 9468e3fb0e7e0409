use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        dataset,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let mut pool = super::open_pool(&cfg.database)?;
        ExportLogic::export(
            &mut pool,
            cfg.organization,
            &ExportRequest {
                dataset: *dataset,
                format: *format,
                file,
                range: range.as_deref(),
                force: *force,
            },
        )?;
    }

    Ok(())
}
