//! Message templates per event and chat dialect.
//!
//! Both dialects of an event use the same variables, so one `Vars` map
//! renders either output.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    CheckIn,
    CheckOut,
    LateArrival,
    IncidentCreated,
    IncidentResolved,
    FormSubmitted,
    RouteAssigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Slack,
    Discord,
}

/// Header + body of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub header: &'static str,
    pub body: &'static str,
}

impl NotificationEvent {
    pub const ALL: [NotificationEvent; 7] = [
        NotificationEvent::CheckIn,
        NotificationEvent::CheckOut,
        NotificationEvent::LateArrival,
        NotificationEvent::IncidentCreated,
        NotificationEvent::IncidentResolved,
        NotificationEvent::FormSubmitted,
        NotificationEvent::RouteAssigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::CheckIn => "check_in",
            NotificationEvent::CheckOut => "check_out",
            NotificationEvent::LateArrival => "late_arrival",
            NotificationEvent::IncidentCreated => "incident_created",
            NotificationEvent::IncidentResolved => "incident_resolved",
            NotificationEvent::FormSubmitted => "form_submitted",
            NotificationEvent::RouteAssigned => "route_assigned",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::Other(format!("Unknown notification event: {}", s)))
    }

    /// Variables the templates of this event refer to.
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            NotificationEvent::CheckIn => &["name", "date", "time"],
            NotificationEvent::CheckOut => &["name", "date", "time", "hours"],
            NotificationEvent::LateArrival => &["name", "date", "time"],
            NotificationEvent::IncidentCreated => {
                &["incident_id", "title", "severity", "occurrences", "services"]
            }
            NotificationEvent::IncidentResolved => &["incident_id", "title", "resolved_at"],
            NotificationEvent::FormSubmitted => &["name", "form", "outlet", "submitted_at"],
            NotificationEvent::RouteAssigned => &["name", "route", "schedule"],
        }
    }

    /// Embed colour used by the Discord payload.
    pub fn color(&self) -> u32 {
        match self {
            NotificationEvent::CheckIn | NotificationEvent::CheckOut => 0x2ECC71,
            NotificationEvent::LateArrival => 0xF1C40F,
            NotificationEvent::IncidentCreated => 0xE74C3C,
            NotificationEvent::IncidentResolved => 0x3498DB,
            NotificationEvent::FormSubmitted | NotificationEvent::RouteAssigned => 0x9B59B6,
        }
    }

    pub fn template(&self, dialect: Dialect) -> Template {
        match dialect {
            Dialect::Slack => self.slack(),
            Dialect::Discord => self.discord(),
        }
    }

    fn slack(&self) -> Template {
        match self {
            NotificationEvent::CheckIn => Template {
                header: "Check-in",
                body: "*{{name}}* checked in on {{date}} at {{time}}.",
            },
            NotificationEvent::CheckOut => Template {
                header: "Check-out",
                body: "*{{name}}* checked out on {{date}} at {{time}} after {{hours}}h.",
            },
            NotificationEvent::LateArrival => Template {
                header: ":warning: Late arrival",
                body: "*{{name}}* arrived late on {{date}} at {{time}}.",
            },
            NotificationEvent::IncidentCreated => Template {
                header: ":rotating_light: Incident #{{incident_id}}",
                body: "*{{title}}*\nSeverity: *{{severity}}*\nOccurrences: {{occurrences}}\nServices: {{services}}",
            },
            NotificationEvent::IncidentResolved => Template {
                header: ":white_check_mark: Incident #{{incident_id}} resolved",
                body: "*{{title}}* was resolved at {{resolved_at}}.",
            },
            NotificationEvent::FormSubmitted => Template {
                header: "Form submitted",
                body: "*{{name}}* submitted _{{form}}_ at {{outlet}} ({{submitted_at}}).",
            },
            NotificationEvent::RouteAssigned => Template {
                header: "Route assigned",
                body: "Route *{{route}}* was assigned to *{{name}}* ({{schedule}}).",
            },
        }
    }

    fn discord(&self) -> Template {
        match self {
            NotificationEvent::CheckIn => Template {
                header: "Check-in",
                body: "**{{name}}** checked in on {{date}} at {{time}}.",
            },
            NotificationEvent::CheckOut => Template {
                header: "Check-out",
                body: "**{{name}}** checked out on {{date}} at {{time}} after {{hours}}h.",
            },
            NotificationEvent::LateArrival => Template {
                header: "Late arrival",
                body: "**{{name}}** arrived late on {{date}} at {{time}}.",
            },
            NotificationEvent::IncidentCreated => Template {
                header: "Incident #{{incident_id}}",
                body: "**{{title}}**\nSeverity: **{{severity}}**\nOccurrences: {{occurrences}}\nServices: {{services}}",
            },
            NotificationEvent::IncidentResolved => Template {
                header: "Incident #{{incident_id}} resolved",
                body: "**{{title}}** was resolved at {{resolved_at}}.",
            },
            NotificationEvent::FormSubmitted => Template {
                header: "Form submitted",
                body: "**{{name}}** submitted *{{form}}* at {{outlet}} ({{submitted_at}}).",
            },
            NotificationEvent::RouteAssigned => Template {
                header: "Route assigned",
                body: "Route **{{route}}** was assigned to **{{name}}** ({{schedule}}).",
            },
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Slack => "slack",
            Dialect::Discord => "discord",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "slack" => Ok(Dialect::Slack),
            "discord" => Ok(Dialect::Discord),
            other => Err(AppError::Other(format!("Unknown dialect: {}", other))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
