//! Outbound integrations (LLM, e-mail, chat webhooks).
//!
//! `Services` is built once at startup from the configuration and secrets
//! and passed down to the commands that talk to the outside world.

pub mod email;
pub mod http;
pub mod llm;
pub mod webhook;

use crate::config::{Config, Secrets};
use crate::core::incident::analysis::Analyzer;
use crate::core::notify::{Dialect, WebhookClient};
use crate::errors::AppResult;
use crate::ui::messages::warning;
use email::EmailTransport;
use webhook::HttpWebhookTransport;

#[derive(Default)]
pub struct Services {
    pub analyzer: Option<Box<dyn Analyzer>>,
    pub email: Option<Box<dyn EmailTransport>>,
    pub webhooks: Option<WebhookClient>,
}

impl Services {
    pub fn from_config(cfg: &Config, secrets: &Secrets) -> AppResult<Self> {
        let client = http::build_client(cfg.http_timeout_secs)?;

        let analyzer: Option<Box<dyn Analyzer>> = secrets.llm_api_key.clone().map(|key| {
            Box::new(llm::LlmAnalyzer::new(client.clone(), &cfg.llm, key)) as Box<dyn Analyzer>
        });

        let email = match email::transport_from_config(&cfg.email, secrets, &client) {
            Ok(t) => t,
            Err(e) => {
                warning(format!("E-mail alerts disabled: {}", e));
                None
            }
        };

        let mut targets = Vec::new();
        if let Some(url) = cfg.webhooks.slack_url.as_ref().filter(|u| !u.is_empty()) {
            targets.push((Dialect::Slack, url.clone()));
        }
        if let Some(url) = cfg.webhooks.discord_url.as_ref().filter(|u| !u.is_empty()) {
            targets.push((Dialect::Discord, url.clone()));
        }
        let webhooks = (!targets.is_empty()).then(|| {
            WebhookClient::new(Box::new(HttpWebhookTransport::new(client.clone())), targets)
        });

        Ok(Self {
            analyzer,
            email,
            webhooks,
        })
    }
}
