use super::alert::send_alert;
use super::analysis::{AnalysisRequest, Analyzer, analyze_or_fallback};
use super::classify::{classify, title_for};
use super::pattern::{PatternGroup, group_errors, parse_log_lines};
use crate::config::{EmailConfig, IncidentConfig};
use crate::core::notify::{NotificationEvent, Vars, WebhookClient, notify_quiet};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::incidents;
use crate::errors::{AppError, AppResult};
use crate::models::incident::{Incident, IncidentStatus};
use crate::services::Services;
use crate::services::email::EmailTransport;
use crate::ui::messages::{detail, info, success, warning};
use crate::utils::colors::{RESET, color_for_severity};
use crate::utils::date::now;
use crate::utils::table::Table;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub entries: usize,
    pub rejected_lines: usize,
    pub groups: usize,
    pub below_threshold: usize,
    pub created: Vec<i64>,
    pub updated: Vec<i64>,
    pub alerts: usize,
}

/// Everything a scan may reach outside the database.
pub struct ScanContext<'a> {
    pub incidents: &'a IncidentConfig,
    pub email: &'a EmailConfig,
    pub analyzer: Option<&'a dyn Analyzer>,
    pub transport: Option<&'a dyn EmailTransport>,
    pub webhooks: Option<&'a WebhookClient>,
    pub alert: bool,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        incidents: &'a IncidentConfig,
        email: &'a EmailConfig,
        services: &'a Services,
        alert: bool,
    ) -> Self {
        Self {
            incidents,
            email,
            analyzer: services.analyzer.as_deref(),
            transport: services.email.as_deref(),
            webhooks: services.webhooks.as_ref(),
            alert,
        }
    }
}

/// Keep the newest `max` samples.
fn cap_logs(logs: &mut Vec<String>, max: usize) {
    if logs.len() > max {
        let excess = logs.len() - max;
        logs.drain(..excess);
    }
}

fn incident_vars(inc: &Incident) -> Vars {
    let mut vars = Vars::new();
    vars.insert("incident_id".into(), inc.id.to_string());
    vars.insert("title".into(), inc.title.clone());
    vars.insert("severity".into(), inc.severity.to_string());
    vars.insert("occurrences".into(), inc.occurrences.to_string());
    vars.insert(
        "services".into(),
        inc.affected_services.iter().cloned().collect::<Vec<_>>().join(", "),
    );
    if let Some(r) = &inc.resolved_at {
        vars.insert("resolved_at".into(), r.clone());
    }
    vars
}

/// High-level business logic for the `incident` command.
pub struct IncidentLogic;

impl IncidentLogic {
    pub fn scan_file(pool: &mut DbPool, file: &Path, ctx: &ScanContext) -> AppResult<ScanOutcome> {
        let text = fs::read_to_string(file)?;
        let (entries, rejected) = parse_log_lines(&text);
        if rejected > 0 {
            warning(format!("{} line(s) of {} are not valid log entries.", rejected, file.display()));
        }

        let mut outcome = Self::scan(pool, &group_errors(&entries), ctx)?;
        outcome.entries = entries.len();
        outcome.rejected_lines = rejected;
        Ok(outcome)
    }

    /// Turn pattern groups into incidents. Groups below the configured
    /// threshold are ignored; an unresolved incident with the same pattern
    /// absorbs the new occurrences instead of getting a twin.
    pub fn scan(pool: &mut DbPool, groups: &[PatternGroup], ctx: &ScanContext) -> AppResult<ScanOutcome> {
        let mut outcome = ScanOutcome {
            groups: groups.len(),
            ..Default::default()
        };
        let conn = &pool.conn;

        for group in groups {
            if group.count < ctx.incidents.min_occurrences {
                outcome.below_threshold += 1;
                continue;
            }

            match incidents::load_open_by_pattern(conn, &group.pattern)? {
                Some(existing) => {
                    let (inc, escalated) = Self::absorb(conn, existing, group, ctx)?;
                    outcome.updated.push(inc.id);
                    if escalated && ctx.alert && Self::alert(conn, &inc, ctx)? {
                        outcome.alerts += 1;
                    }
                }
                None => {
                    let inc = Self::open(conn, group, ctx)?;
                    outcome.created.push(inc.id);
                    if ctx.alert && Self::alert(conn, &inc, ctx)? {
                        outcome.alerts += 1;
                    }
                    notify_quiet(
                        ctx.webhooks,
                        conn,
                        NotificationEvent::IncidentCreated,
                        &incident_vars(&inc),
                    );
                }
            }
        }

        ttlog_quiet(
            conn,
            "incident_scan",
            &format!("{} group(s)", outcome.groups),
            &format!(
                "created {}, updated {}, below threshold {}",
                outcome.created.len(),
                outcome.updated.len(),
                outcome.below_threshold
            ),
        );

        Ok(outcome)
    }

    fn open(conn: &Connection, group: &PatternGroup, ctx: &ScanContext) -> AppResult<Incident> {
        let title = title_for(&group.pattern, group.count);
        let severity = classify(&group.pattern, group.count);

        let mut logs = group.samples.clone();
        cap_logs(&mut logs, ctx.incidents.max_logs);

        let analysis = analyze_or_fallback(
            ctx.analyzer,
            &AnalysisRequest {
                title: &title,
                pattern: &group.pattern,
                severity,
                occurrences: group.count,
                services: &group.services,
                samples: &logs,
            },
        );

        let mut inc = Incident {
            id: 0,
            title,
            severity,
            status: IncidentStatus::Investigating,
            pattern: group.pattern.clone(),
            occurrences: group.count as i64,
            affected_services: group.services.clone(),
            logs,
            ai_analysis: Some(analysis),
            created_at: now().format(TIMESTAMP_FMT).to_string(),
            resolved_at: None,
        };
        inc.id = incidents::insert_incident(conn, &inc)?;

        ttlog_quiet(
            conn,
            "incident_open",
            &format!("incident {}", inc.id),
            &format!("{} [{}]", inc.title, inc.severity),
        );
        success(format!("Incident #{} opened: {} [{}]", inc.id, inc.title, inc.severity));
        Ok(inc)
    }

    /// Returns the updated incident and whether it newly crossed into an
    /// alerting severity.
    fn absorb(
        conn: &Connection,
        mut inc: Incident,
        group: &PatternGroup,
        ctx: &ScanContext,
    ) -> AppResult<(Incident, bool)> {
        let before = inc.severity;

        inc.occurrences += group.count as i64;
        inc.affected_services.extend(group.services.iter().cloned());
        inc.logs.extend(group.samples.iter().cloned());
        cap_logs(&mut inc.logs, ctx.incidents.max_logs);

        let total = inc.occurrences.max(0) as usize;
        inc.severity = classify(&inc.pattern, total);
        inc.title = title_for(&inc.pattern, total);

        incidents::update_incident(conn, &inc)?;

        ttlog_quiet(
            conn,
            "incident_update",
            &format!("incident {}", inc.id),
            &format!("+{} occurrence(s), now {} [{}]", group.count, inc.occurrences, inc.severity),
        );
        info(format!(
            "Incident #{} updated: {} [{}]",
            inc.id, inc.title, inc.severity
        ));

        let escalated = inc.severity.requires_alert() && !before.requires_alert();
        Ok((inc, escalated))
    }

    fn alert(conn: &Connection, inc: &Incident, ctx: &ScanContext) -> AppResult<bool> {
        send_alert(
            conn,
            ctx.transport,
            &ctx.email.from_address,
            &ctx.email.admin_address,
            inc,
        )
    }

    /// Move an incident to `resolved`. Resolving twice is rejected.
    pub fn resolve(
        pool: &mut DbPool,
        id: i64,
        webhooks: Option<&WebhookClient>,
    ) -> AppResult<Incident> {
        let mut inc = incidents::load_incident(&pool.conn, id)?;
        if inc.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                from: inc.status.to_string(),
                to: IncidentStatus::Resolved.to_string(),
            });
        }

        inc.status = IncidentStatus::Resolved;
        inc.resolved_at = Some(now().format(TIMESTAMP_FMT).to_string());
        incidents::update_incident(&pool.conn, &inc)?;

        ttlog_quiet(&pool.conn, "incident_resolve", &format!("incident {id}"), &inc.title);
        success(format!("Incident #{} resolved.", id));

        notify_quiet(
            webhooks,
            &pool.conn,
            NotificationEvent::IncidentResolved,
            &incident_vars(&inc),
        );
        Ok(inc)
    }

    pub fn list(pool: &mut DbPool, include_resolved: bool) -> AppResult<Vec<Incident>> {
        incidents::load_incidents(&pool.conn, include_resolved)
    }

    pub fn print_list(list: &[Incident]) {
        if list.is_empty() {
            info("No incidents.");
            return;
        }

        let mut table = Table::new(vec!["ID", "Severity", "Status", "Count", "Title", "Created"]);
        for inc in list {
            table.add_row(vec![
                inc.id.to_string(),
                format!("{}{}{}", color_for_severity(inc.severity), inc.severity, RESET),
                inc.status.to_string(),
                inc.occurrences.to_string(),
                inc.title.clone(),
                inc.created_at.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    pub fn print_detail(inc: &Incident) {
        println!(
            "#{} {}{}{} {}",
            inc.id,
            color_for_severity(inc.severity),
            inc.severity.as_str().to_uppercase(),
            RESET,
            inc.title
        );
        detail("Status", inc.status);
        detail("Pattern", &inc.pattern);
        detail("Occurrences", inc.occurrences);
        detail(
            "Services",
            inc.affected_services.iter().cloned().collect::<Vec<_>>().join(", "),
        );
        detail("Created", &inc.created_at);
        if let Some(r) = &inc.resolved_at {
            detail("Resolved", r);
        }

        if let Some(a) = &inc.ai_analysis {
            println!();
            detail("Probable cause", &a.probable_cause);
            detail("Confidence", format!("{}%", a.fix_confidence));
            detail("Auto-fixable", if a.auto_fixable { "yes" } else { "no" });
            detail("Source", format!("{:?}", a.source).to_lowercase());
            for (i, action) in a.recommended_actions.iter().enumerate() {
                println!("   {}. {}", i + 1, action);
            }
        }

        if !inc.logs.is_empty() {
            println!();
            println!("Sample logs:");
            for l in &inc.logs {
                println!("   {}", l);
            }
        }
    }
}
