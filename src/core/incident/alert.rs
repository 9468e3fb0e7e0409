use crate::db::log::ttlog_quiet;
use crate::db::queries::notifications;
use crate::errors::AppResult;
use crate::models::incident::Incident;
use crate::services::email::{EmailMessage, EmailTransport};
use crate::ui::messages::{success, warning};
use rusqlite::Connection;

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn alert_subject(inc: &Incident) -> String {
    format!("[{}] {}", inc.severity.as_str().to_uppercase(), inc.title)
}

/// HTML body of the administrator alert.
pub fn render_alert_html(inc: &Incident) -> String {
    let services = if inc.affected_services.is_empty() {
        "unknown".to_string()
    } else {
        inc.affected_services.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    let logs: String = inc
        .logs
        .iter()
        .map(|l| format!("<li><code>{}</code></li>", escape_html(l)))
        .collect();

    let analysis = match &inc.ai_analysis {
        Some(a) => {
            let actions: String = a
                .recommended_actions
                .iter()
                .map(|x| format!("<li>{}</li>", escape_html(x)))
                .collect();
            format!(
                "<h3>Analysis</h3>\
                 <p><b>Probable cause:</b> {}</p>\
                 <ol>{}</ol>\
                 <p>Fix confidence: {}% &middot; auto-fixable: {}</p>",
                escape_html(&a.probable_cause),
                actions,
                a.fix_confidence,
                if a.auto_fixable { "yes" } else { "no" }
            )
        }
        None => String::new(),
    };

    format!(
        "<html><body style=\"font-family:sans-serif\">\
         <h2>Incident #{}: {}</h2>\
         <table>\
         <tr><td><b>Severity</b></td><td>{}</td></tr>\
         <tr><td><b>Status</b></td><td>{}</td></tr>\
         <tr><td><b>Occurrences</b></td><td>{}</td></tr>\
         <tr><td><b>Services</b></td><td>{}</td></tr>\
         <tr><td><b>Pattern</b></td><td><code>{}</code></td></tr>\
         </table>\
         {}\
         <h3>Sample logs</h3><ul>{}</ul>\
         </body></html>",
        inc.id,
        escape_html(&inc.title),
        inc.severity,
        inc.status,
        inc.occurrences,
        escape_html(&services),
        escape_html(&inc.pattern),
        analysis,
        logs
    )
}

/// Mail the administrator about a high or critical incident.
///
/// Returns whether a message was attempted. Delivery failures are recorded
/// and reported, never propagated.
pub fn send_alert(
    conn: &Connection,
    transport: Option<&dyn EmailTransport>,
    from: &str,
    admin: &str,
    inc: &Incident,
) -> AppResult<bool> {
    if !inc.severity.requires_alert() {
        return Ok(false);
    }
    let Some(transport) = transport else {
        return Ok(false);
    };
    if admin.trim().is_empty() {
        warning("No admin address configured (email.admin_address); alert skipped.");
        return Ok(false);
    }

    let msg = EmailMessage {
        from: from.to_string(),
        to: admin.to_string(),
        subject: alert_subject(inc),
        html: render_alert_html(inc),
    };

    let result = transport.send(&msg);
    let error = result.err().map(|e| e.to_string());

    notifications::record(
        conn,
        "incident_alert",
        transport.name(),
        &msg.subject,
        match &error {
            None => Ok(()),
            Some(e) => Err(e.as_str()),
        },
    )?;

    match error {
        None => {
            ttlog_quiet(conn, "incident_alert", &format!("incident {}", inc.id), &msg.subject);
            success(format!("Alert for incident #{} sent to {}.", inc.id, admin));
        }
        Some(e) => {
            ttlog_quiet(conn, "incident_alert_failed", &format!("incident {}", inc.id), &e);
            warning(format!("Alert for incident #{} failed: {}", inc.id, e));
        }
    }

    Ok(true)
}
