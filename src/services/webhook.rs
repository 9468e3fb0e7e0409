use super::http::describe_failure;
use crate::errors::{AppError, AppResult};
use reqwest::blocking::Client;
use serde_json::Value;

/// Posts a JSON document to a chat webhook URL.
pub trait WebhookTransport {
    fn post_json(&self, url: &str, body: &Value) -> AppResult<()>;
}

pub struct HttpWebhookTransport {
    client: Client,
}

impl HttpWebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl WebhookTransport for HttpWebhookTransport {
    fn post_json(&self, url: &str, body: &Value) -> AppResult<()> {
        let resp = self.client.post(url).json(body).send()?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = resp.text().unwrap_or_default();
            Err(AppError::Webhook(describe_failure(status, &text)))
        }
    }
}
