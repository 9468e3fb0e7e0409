pub mod attendance;
pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod form;
pub mod incident;
pub mod init;
pub mod log;
pub mod notify;
pub mod org;
pub mod payroll;
pub mod route;

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::path::absolute;
use serde::de::DeserializeOwned;
use std::fs;

/// Open the configured database with the schema brought up to date.
pub(crate) fn open_pool(database: &str) -> AppResult<DbPool> {
    DbPool::open(database)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &str) -> AppResult<T> {
    let content = fs::read_to_string(absolute(path))?;
    Ok(serde_json::from_str(&content)?)
}
