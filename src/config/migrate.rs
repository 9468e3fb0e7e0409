//! Configuration file maintenance: detect keys missing from an older file
//! and rewrite it with the current defaults filled in.

use super::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Walk the default configuration and collect dotted keys that the file on
/// disk does not define.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let on_disk: Value = serde_yaml::from_str(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let mut out = Vec::new();
    if let (Some(expected), Some(actual)) = (defaults.as_mapping(), on_disk.as_mapping()) {
        collect_missing("", expected, actual, &mut out);
    } else if on_disk.is_null() {
        // Empty file: everything is missing.
        if let Some(expected) = defaults.as_mapping() {
            collect_missing("", expected, &Mapping::new(), &mut out);
        }
    }
    Ok(out)
}

fn collect_missing(prefix: &str, expected: &Mapping, actual: &Mapping, out: &mut Vec<String>) {
    for (key, value) in expected {
        let Some(name) = key.as_str() else {
            continue;
        };
        let dotted = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        match (value.as_mapping(), actual.get(key)) {
            (_, None) => out.push(dotted),
            (Some(sub_expected), Some(sub_actual)) => {
                if let Some(sub_actual) = sub_actual.as_mapping() {
                    collect_missing(&dotted, sub_expected, sub_actual, out);
                }
            }
            _ => {}
        }
    }
}

/// Rewrite the configuration file so every current key is present.
/// The previous file is kept next to it with a `.bak` extension.
/// Returns `Ok(false)` when nothing had to change.
pub fn migrate_config(path: &Path) -> AppResult<bool> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        info("Configuration is up to date.");
        return Ok(false);
    }

    let cfg = Config::load_from(path)?;

    let backup = path.with_extension("conf.bak");
    fs::copy(path, &backup)?;

    cfg.save_to(path)?;

    success(format!(
        "Configuration migrated ({} key(s) added), backup at {}",
        missing.len(),
        backup.display()
    ));
    Ok(true)
}
