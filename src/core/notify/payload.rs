use super::catalog::{Dialect, NotificationEvent};
use super::template::{Vars, render};
use serde_json::{Value, json};

/// Render the event templates and wrap them into the platform's card JSON.
pub fn build_payload(event: NotificationEvent, dialect: Dialect, vars: &Vars) -> Value {
    let tpl = event.template(dialect);
    let header = render(tpl.header, vars);
    let body = render(tpl.body, vars);

    match dialect {
        Dialect::Slack => json!({
            "text": format!("{}: {}", header, body),
            "blocks": [
                { "type": "header", "text": { "type": "plain_text", "text": header } },
                { "type": "section", "text": { "type": "mrkdwn", "text": body } },
                { "type": "context", "elements": [
                    { "type": "mrkdwn", "text": format!("event: `{}`", event) }
                ] }
            ]
        }),
        Dialect::Discord => json!({
            "embeds": [{
                "title": header,
                "description": body,
                "color": event.color(),
                "footer": { "text": format!("event: {}", event) }
            }]
        }),
    }
}
