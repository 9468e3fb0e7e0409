//! Shared blocking HTTP client.
//!
//! The client is built once by `run()` and handed to every integration that
//! needs it; nothing keeps a global instance.

use crate::errors::AppResult;
use reqwest::blocking::Client;
use std::time::Duration;

pub fn build_client(timeout_secs: u64) -> AppResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("rworkforce/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Status + body of a failed response, trimmed for log lines.
pub fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    let short: String = body.chars().take(200).collect();
    if short.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, short)
    }
}
