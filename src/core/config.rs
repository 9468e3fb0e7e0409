use crate::config::migrate::{migrate_config, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

/// High-level business logic for the `config` command.
pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let ed = editor
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| if cfg!(windows) { "notepad".into() } else { "nano".into() });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start '{}': {}", ed, e)))?;

        if !status.success() {
            return Err(AppError::Config(format!("'{}' exited with {}", ed, status)));
        }
        Ok(())
    }

    /// Report keys the file does not set; returns how many are missing.
    pub fn check(path: &Path) -> AppResult<usize> {
        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("{} key(s) missing, defaults in use:", missing.len()));
            for k in &missing {
                println!("   - {}", k);
            }
            info("Run `rworkforce config --migrate` to write them to the file.");
        }
        Ok(missing.len())
    }

    pub fn migrate(path: &Path) -> AppResult<bool> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist, run `rworkforce init` first",
                path.display()
            )));
        }
        migrate_config(path)
    }
}
