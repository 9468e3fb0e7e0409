use rworkforce::core::notify::{
    Dialect, NotificationEvent, Vars, WebhookClient, build_payload, parse_vars, render,
};
use rworkforce::db::pool::DbPool;
use rworkforce::db::queries::notifications;
use rworkforce::errors::{AppError, AppResult};
use rworkforce::services::webhook::WebhookTransport;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn vars(pairs: &[(&str, &str)]) -> Vars {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Records posted payloads; fails for URLs containing "down".
#[derive(Clone, Default)]
struct FakeWebhook {
    posted: Rc<RefCell<Vec<(String, Value)>>>,
}

impl WebhookTransport for FakeWebhook {
    fn post_json(&self, url: &str, body: &Value) -> AppResult<()> {
        if url.contains("down") {
            return Err(AppError::Webhook("HTTP 500".into()));
        }
        self.posted.borrow_mut().push((url.to_string(), body.clone()));
        Ok(())
    }
}

#[test]
fn test_render_replaces_known_keys_only() {
    assert_eq!(render("Hello {{name}}", &vars(&[("name", "Ann")])), "Hello Ann");
    assert_eq!(
        render("{{name}} at {{time}}", &vars(&[("name", "Ann")])),
        "Ann at {{time}}"
    );
    assert_eq!(render("{{a}}{{a}}", &vars(&[("a", "x")])), "xx");
    // values are inserted verbatim
    assert_eq!(render("{{v}}", &vars(&[("v", "<b>&</b>")])), "<b>&</b>");
}

#[test]
fn test_parse_vars() {
    let v = parse_vars(&["name=Ann", "note=a=b"]).unwrap();
    assert_eq!(v["name"], "Ann");
    assert_eq!(v["note"], "a=b");

    assert!(parse_vars(&["missing"]).is_err());
    assert!(parse_vars(&["=x"]).is_err());
}

#[test]
fn test_event_names_round_trip() {
    for e in NotificationEvent::ALL {
        assert_eq!(NotificationEvent::parse(e.as_str()).unwrap(), e);
    }
    assert!(NotificationEvent::parse("payday").is_err());
    assert_eq!(Dialect::parse("Discord").unwrap(), Dialect::Discord);
}

#[test]
fn test_templates_use_declared_variables_only() {
    for e in NotificationEvent::ALL {
        let declared: Vars = e
            .variables()
            .iter()
            .map(|k| (k.to_string(), "x".to_string()))
            .collect();
        for dialect in [Dialect::Slack, Dialect::Discord] {
            let tpl = e.template(dialect);
            let text = format!(
                "{}{}",
                render(tpl.header, &declared),
                render(tpl.body, &declared)
            );
            assert!(!text.contains("{{"), "{} / {}: {}", e, dialect, text);
        }
    }
}

#[test]
fn test_slack_payload_shape() {
    let p = build_payload(
        NotificationEvent::CheckIn,
        Dialect::Slack,
        &vars(&[("name", "Ann"), ("date", "2025-03-03"), ("time", "08:55")]),
    );

    assert!(p["text"].as_str().unwrap().contains("Ann"));
    let blocks = p["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["type"], "header");
    assert_eq!(blocks[1]["type"], "section");
    assert!(blocks[1]["text"]["text"].as_str().unwrap().contains("08:55"));
}

#[test]
fn test_discord_payload_shape() {
    let p = build_payload(
        NotificationEvent::LateArrival,
        Dialect::Discord,
        &vars(&[("name", "Bob"), ("date", "2025-03-03"), ("time", "09:20")]),
    );

    let embed = &p["embeds"][0];
    assert_eq!(embed["title"], "Late arrival");
    assert!(embed["description"].as_str().unwrap().contains("**Bob**"));
    assert_eq!(embed["color"], NotificationEvent::LateArrival.color());
}

#[test]
fn test_broadcast_records_every_delivery() {
    let pool = DbPool::in_memory().unwrap();
    let fake = FakeWebhook::default();
    let client = WebhookClient::new(
        Box::new(fake.clone()),
        vec![
            (Dialect::Slack, "https://hooks.example/slack".to_string()),
            (Dialect::Discord, "https://hooks.example/down".to_string()),
        ],
    );

    let deliveries = client
        .broadcast(
            &pool.conn,
            NotificationEvent::RouteAssigned,
            &vars(&[("name", "Ann"), ("route", "North"), ("schedule", "every Monday")]),
        )
        .unwrap();

    assert_eq!(deliveries.len(), 2);
    assert!(deliveries[0].is_sent());
    assert!(!deliveries[1].is_sent());

    let posted = fake.posted.borrow();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].1["text"].as_str().unwrap().contains("North"));

    let rows = notifications::load_recent(&pool.conn, 10).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r.status == "failed" && r.channel == "discord"));
    assert!(rows.iter().any(|r| r.status == "sent" && r.channel == "slack"));
}

#[test]
fn test_send_to_unconfigured_dialect_fails() {
    let pool = DbPool::in_memory().unwrap();
    let client = WebhookClient::new(
        Box::new(FakeWebhook::default()),
        vec![(Dialect::Slack, "https://hooks.example/slack".to_string())],
    );

    let res = client.send(
        &pool.conn,
        NotificationEvent::CheckOut,
        Dialect::Discord,
        &serde_json::json!({}),
    );
    assert!(res.is_err());
}
