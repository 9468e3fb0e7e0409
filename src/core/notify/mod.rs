pub mod catalog;
pub mod payload;
pub mod template;

pub use catalog::{Dialect, NotificationEvent};
pub use payload::build_payload;
pub use template::{Vars, parse_vars, render};

use crate::db::log::ttlog_quiet;
use crate::db::queries::notifications;
use crate::errors::{AppError, AppResult};
use crate::services::webhook::WebhookTransport;
use crate::ui::messages::{success, warning};
use rusqlite::Connection;
use serde_json::Value;

/// Outcome of one webhook post, as recorded in `notifications`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub notification_id: i64,
    pub dialect: Dialect,
    pub error: Option<String>,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        self.error.is_none()
    }
}

/// Chat webhooks configured for this installation.
pub struct WebhookClient {
    transport: Box<dyn WebhookTransport>,
    targets: Vec<(Dialect, String)>,
}

impl WebhookClient {
    pub fn new(transport: Box<dyn WebhookTransport>, targets: Vec<(Dialect, String)>) -> Self {
        Self { transport, targets }
    }

    pub fn dialects(&self) -> Vec<Dialect> {
        self.targets.iter().map(|(d, _)| *d).collect()
    }

    /// Post one payload to the webhook of `dialect` and record the outcome.
    /// A failed post is a `Delivery` with an error, not an `Err`.
    pub fn send(
        &self,
        conn: &Connection,
        event: NotificationEvent,
        dialect: Dialect,
        payload: &Value,
    ) -> AppResult<Delivery> {
        let url = self
            .targets
            .iter()
            .find(|(d, _)| *d == dialect)
            .map(|(_, u)| u.as_str())
            .ok_or_else(|| AppError::Webhook(format!("no {} webhook configured", dialect)))?;

        let result = self.transport.post_json(url, payload);
        let error = result.err().map(|e| e.to_string());

        let notification_id = notifications::record(
            conn,
            event.as_str(),
            dialect.as_str(),
            &payload.to_string(),
            match &error {
                None => Ok(()),
                Some(e) => Err(e.as_str()),
            },
        )?;

        Ok(Delivery {
            notification_id,
            dialect,
            error,
        })
    }

    /// Render and post the event to every configured webhook.
    pub fn broadcast(
        &self,
        conn: &Connection,
        event: NotificationEvent,
        vars: &Vars,
    ) -> AppResult<Vec<Delivery>> {
        let mut out = Vec::with_capacity(self.targets.len());
        for dialect in self.dialects() {
            let payload = build_payload(event, dialect, vars);
            out.push(self.send(conn, event, dialect, &payload)?);
        }
        Ok(out)
    }
}

/// Broadcast when webhooks are configured; failures are reported and logged
/// but never abort the calling command.
pub fn notify_quiet(
    client: Option<&WebhookClient>,
    conn: &Connection,
    event: NotificationEvent,
    vars: &Vars,
) {
    let Some(client) = client else {
        return;
    };

    match client.broadcast(conn, event, vars) {
        Ok(deliveries) => {
            for d in deliveries {
                match &d.error {
                    None => success(format!("{} notification sent to {}.", event, d.dialect)),
                    Some(e) => {
                        warning(format!("{} notification to {} failed: {}", event, d.dialect, e));
                        ttlog_quiet(conn, "notify_failed", d.dialect.as_str(), e);
                    }
                }
            }
        }
        Err(e) => warning(format!("Could not send {} notification: {}", event, e)),
    }
}
