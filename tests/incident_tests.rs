use rworkforce::config::{EmailConfig, IncidentConfig};
use rworkforce::core::incident::analysis::{AnalysisRequest, Analyzer, rule_based};
use rworkforce::core::incident::{
    IncidentLogic, ScanContext, classify, extract_pattern, group_errors, parse_log_lines,
    title_for,
};
use rworkforce::db::pool::DbPool;
use rworkforce::db::queries::{incidents, notifications};
use rworkforce::errors::{AppError, AppResult};
use rworkforce::models::incident::{
    Analysis, AnalysisSource, IncidentStatus, LogEntry, LogLevel, Severity,
};
use rworkforce::services::email::{EmailMessage, EmailTransport};
use rworkforce::services::llm::parse_analysis;
use std::cell::RefCell;

fn entry(level: LogLevel, message: &str, service: &str) -> LogEntry {
    LogEntry {
        timestamp: None,
        level,
        message: message.to_string(),
        service: Some(service.to_string()),
    }
}

fn errors(message: &str, n: usize) -> Vec<LogEntry> {
    (0..n)
        .map(|i| entry(LogLevel::Error, &format!("{} {}", message, i), "api"))
        .collect()
}

#[derive(Default)]
struct FakeMailer {
    sent: RefCell<Vec<EmailMessage>>,
}

impl EmailTransport for FakeMailer {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn send(&self, msg: &EmailMessage) -> AppResult<()> {
        self.sent.borrow_mut().push(msg.clone());
        Ok(())
    }
}

struct BrokenAnalyzer;

impl Analyzer for BrokenAnalyzer {
    fn analyze(&self, _req: &AnalysisRequest) -> AppResult<Analysis> {
        Err(AppError::Analysis("service unavailable".into()))
    }
}

fn email_config() -> EmailConfig {
    EmailConfig {
        admin_address: "ops@example.com".to_string(),
        ..EmailConfig::default()
    }
}

#[test]
fn test_extract_pattern_normalizes_variable_parts() {
    assert_eq!(
        extract_pattern("User 123 not found for 550e8400-e29b-41d4-a716-446655440000"),
        "User NUM not found for UUID"
    );
    assert_eq!(
        extract_pattern("GET https://api.example.com/v1/items?id=7 failed after 3000ms"),
        "GET URL failed after NUMms"
    );
    assert_eq!(
        extract_pattern("ENOENT: no such file '/var/app/data/42.json'"),
        "ENOENT: no such file 'PATH'"
    );
    assert_eq!(extract_pattern("  too   many \t spaces  "), "too many spaces");
}

#[test]
fn test_group_errors_counts_and_skips_lower_levels() {
    let mut entries = errors("Timeout after", 4);
    entries.push(entry(LogLevel::Warn, "Timeout after 1", "api"));
    entries.push(entry(LogLevel::Critical, "Database down", "db"));
    entries.push(entry(LogLevel::Error, "Timeout after 9", "worker"));

    let groups = group_errors(&entries);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].pattern, "Timeout after NUM");
    assert_eq!(groups[0].count, 5);
    assert_eq!(
        groups[0].services.iter().cloned().collect::<Vec<_>>(),
        vec!["api".to_string(), "worker".to_string()]
    );
    assert_eq!(groups[1].count, 1);
}

#[test]
fn test_group_errors_merges_messages_differing_by_uuid_and_number() {
    let entries = vec![
        entry(
            LogLevel::Error,
            "Order 1001 failed for user 550e8400-e29b-41d4-a716-446655440000",
            "api",
        ),
        entry(
            LogLevel::Error,
            "Order 87 failed for user 6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "api",
        ),
    ];

    let groups = group_errors(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].pattern, "Order NUM failed for user UUID");
    assert_eq!(groups[0].count, 2);
}

#[test]
fn test_parse_log_lines_reports_rejects() {
    let text = r#"
{"level":"error","message":"boom 1","service":"api"}
not json
{"level":"warning","message":"careful"}
{"message":"no level"}
"#;
    let (entries, rejected) = parse_log_lines(text);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].level, LogLevel::Warn);
    assert_eq!(rejected, 2);
}

#[test]
fn test_severity_thresholds() {
    assert_eq!(classify("Timeout after NUM", 3), Severity::Low);
    assert_eq!(classify("Timeout after NUM", 6), Severity::Medium);
    assert_eq!(classify("Timeout after NUM", 10), Severity::Medium);
    assert_eq!(classify("Timeout after NUM", 11), Severity::High);
    assert_eq!(classify("Database connection lost", 3), Severity::Critical);
    assert_eq!(classify("OUTAGE in region", 1), Severity::Critical);
}

#[test]
fn test_titles() {
    assert_eq!(title_for("Request timed out", 4), "Request timeout (4 occurrences)");
    assert_eq!(title_for("supabase insert failed", 1), "Supabase error (1 occurrence)");
    assert_eq!(title_for("something odd", 3), "Recurring error (3 occurrences)");
}

#[test]
fn test_rule_based_analysis() {
    let a = rule_based("Request timeout (5 occurrences)");
    assert_eq!(a.source, AnalysisSource::Rules);
    assert!(!a.recommended_actions.is_empty());

    let unknown = rule_based("Recurring error (3 occurrences)");
    assert_eq!(unknown.fix_confidence, 30);
    assert!(!unknown.auto_fixable);
}

#[test]
fn test_parse_llm_answer_with_fences() {
    let answer = "```json\n{\"probable_cause\":\"Pool exhausted\",\"recommended_actions\":[\"Raise pool size\"],\"fix_confidence\":140,\"auto_fixable\":true}\n```";
    let a = parse_analysis(answer).unwrap();
    assert_eq!(a.probable_cause, "Pool exhausted");
    assert_eq!(a.fix_confidence, 100);
    assert_eq!(a.source, AnalysisSource::Llm);

    assert!(parse_analysis("not json").is_err());
}

#[test]
fn test_scan_creates_incident_above_threshold_only() {
    let mut pool = DbPool::in_memory().unwrap();
    let incident_cfg = IncidentConfig::default();
    let email_cfg = email_config();
    let mailer = FakeMailer::default();
    let ctx = ScanContext {
        incidents: &incident_cfg,
        email: &email_cfg,
        analyzer: Some(&BrokenAnalyzer),
        transport: Some(&mailer),
        webhooks: None,
        alert: true,
    };

    let mut entries = errors("Timeout after", 4);
    entries.extend(errors("Rare failure", 2));
    let outcome = IncidentLogic::scan(&mut pool, &group_errors(&entries), &ctx).unwrap();

    assert_eq!(outcome.groups, 2);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.below_threshold, 1);
    assert_eq!(outcome.alerts, 0);
    assert!(mailer.sent.borrow().is_empty());

    let inc = incidents::load_incident(&pool.conn, outcome.created[0]).unwrap();
    assert_eq!(inc.severity, Severity::Low);
    assert_eq!(inc.status, IncidentStatus::Investigating);
    assert_eq!(inc.occurrences, 4);
    // analyzer failure falls back to the rule table
    assert_eq!(inc.ai_analysis.unwrap().source, AnalysisSource::Rules);
}

#[test]
fn test_scan_dedupes_and_alerts_on_escalation() {
    let mut pool = DbPool::in_memory().unwrap();
    let incident_cfg = IncidentConfig::default();
    let email_cfg = email_config();
    let mailer = FakeMailer::default();
    let ctx = ScanContext {
        incidents: &incident_cfg,
        email: &email_cfg,
        analyzer: None,
        transport: Some(&mailer),
        webhooks: None,
        alert: true,
    };

    let first = IncidentLogic::scan(&mut pool, &group_errors(&errors("Timeout after", 6)), &ctx)
        .unwrap();
    assert_eq!(first.created.len(), 1);
    assert_eq!(first.alerts, 0);

    let second = IncidentLogic::scan(&mut pool, &group_errors(&errors("Timeout after", 6)), &ctx)
        .unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.updated, first.created);
    assert_eq!(second.alerts, 1);

    let inc = incidents::load_incident(&pool.conn, first.created[0]).unwrap();
    assert_eq!(inc.occurrences, 12);
    assert_eq!(inc.severity, Severity::High);
    assert_eq!(inc.logs.len(), incident_cfg.max_logs);
    assert_eq!(inc.logs.last().map(String::as_str), Some("Timeout after 5"));

    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ops@example.com");

    let recorded = notifications::load_recent(&pool.conn, 10).unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event, "incident_alert");
    assert_eq!(recorded[0].status, "sent");
}

#[test]
fn test_critical_incident_alerts_immediately() {
    let mut pool = DbPool::in_memory().unwrap();
    let incident_cfg = IncidentConfig::default();
    let email_cfg = email_config();
    let mailer = FakeMailer::default();
    let ctx = ScanContext {
        incidents: &incident_cfg,
        email: &email_cfg,
        analyzer: None,
        transport: Some(&mailer),
        webhooks: None,
        alert: true,
    };

    let groups = group_errors(&errors("database connection refused on shard", 3));
    let outcome = IncidentLogic::scan(&mut pool, &groups, &ctx).unwrap();

    assert_eq!(outcome.alerts, 1);
    let inc = incidents::load_incident(&pool.conn, outcome.created[0]).unwrap();
    assert_eq!(inc.severity, Severity::Critical);
    assert!(mailer.sent.borrow()[0].html.contains(&inc.title));
}

#[test]
fn test_resolve_twice_is_rejected() {
    let mut pool = DbPool::in_memory().unwrap();
    let incident_cfg = IncidentConfig::default();
    let email_cfg = email_config();
    let ctx = ScanContext {
        incidents: &incident_cfg,
        email: &email_cfg,
        analyzer: None,
        transport: None,
        webhooks: None,
        alert: false,
    };

    let outcome =
        IncidentLogic::scan(&mut pool, &group_errors(&errors("Auth rejected", 3)), &ctx).unwrap();
    let id = outcome.created[0];

    let resolved = IncidentLogic::resolve(&mut pool, id, None).unwrap();
    assert_eq!(resolved.status, IncidentStatus::Resolved);
    assert!(resolved.resolved_at.is_some());

    let again = IncidentLogic::resolve(&mut pool, id, None);
    assert!(matches!(again, Err(AppError::InvalidTransition { .. })));

    // a resolved incident no longer absorbs new occurrences
    let next =
        IncidentLogic::scan(&mut pool, &group_errors(&errors("Auth rejected", 3)), &ctx).unwrap();
    assert_eq!(next.created.len(), 1);
    assert_ne!(next.created[0], id);
}
