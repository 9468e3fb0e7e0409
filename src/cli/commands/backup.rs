use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::utils::path::absolute;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let mut pool = super::open_pool(&cfg.database)?;
        let dest = absolute(file);
        BackupLogic::backup(
            &mut pool,
            &cfg.database,
            &dest.to_string_lossy(),
            *compress,
            *force,
        )?;
    }

    Ok(())
}
