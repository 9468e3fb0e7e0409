//! Outbound e-mail transports.

use super::http::describe_failure;
use crate::config::{EmailConfig, EmailProvider, Secrets};
use crate::errors::{AppError, AppResult};
use chrono::Local;
use reqwest::blocking::Client;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub trait EmailTransport {
    /// Short name stored with delivery records.
    fn name(&self) -> &'static str;

    fn send(&self, msg: &EmailMessage) -> AppResult<()>;
}

/// SendGrid v3 mail API.
pub struct SendGridTransport {
    client: Client,
    api_key: String,
}

impl SendGridTransport {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

impl EmailTransport for SendGridTransport {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    fn send(&self, msg: &EmailMessage) -> AppResult<()> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": msg.to }] }],
            "from": { "email": msg.from },
            "subject": msg.subject,
            "content": [{ "type": "text/html", "value": msg.html }],
        });

        let resp = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(AppError::Email(describe_failure(status, &text)));
        }
        Ok(())
    }
}

/// Writes each message as an `.html` file into a directory.
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(msg: &EmailMessage) -> String {
        let slug: String = msg
            .subject
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .take(40)
            .collect();
        format!("{}_{}.html", Local::now().format("%Y%m%d_%H%M%S%3f"), slug)
    }
}

impl EmailTransport for OutboxTransport {
    fn name(&self) -> &'static str {
        "outbox"
    }

    fn send(&self, msg: &EmailMessage) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(msg));
        let doc = format!(
            "<!-- from: {} -->\n<!-- to: {} -->\n<!-- subject: {} -->\n{}",
            msg.from, msg.to, msg.subject, msg.html
        );
        fs::write(&path, doc).map_err(|e| AppError::Email(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// Pick the transport configured for this installation.
pub fn transport_from_config(
    cfg: &EmailConfig,
    secrets: &Secrets,
    client: &Client,
) -> AppResult<Option<Box<dyn EmailTransport>>> {
    match cfg.provider {
        EmailProvider::None => Ok(None),
        EmailProvider::Outbox => Ok(Some(Box::new(OutboxTransport::new(&cfg.outbox_dir)))),
        EmailProvider::Sendgrid => {
            let key = secrets.sendgrid_api_key.clone().ok_or_else(|| {
                AppError::Config(format!(
                    "email provider is sendgrid but {} is not set",
                    crate::config::SENDGRID_KEY_ENV
                ))
            })?;
            Ok(Some(Box::new(SendGridTransport::new(client.clone(), key))))
        }
    }
}
