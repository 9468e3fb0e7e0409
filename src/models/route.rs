use super::weekday::SystemDay;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "planned",
            RouteStatus::Active => "active",
            RouteStatus::Completed => "completed",
            RouteStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planned" => Some(RouteStatus::Planned),
            "active" => Some(RouteStatus::Active),
            "completed" => Some(RouteStatus::Completed),
            "cancelled" | "canceled" => Some(RouteStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlet {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: i64,
    pub stop_order: i64,
    pub outlet: Outlet,
    pub estimated_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub status: RouteStatus,
    pub route_date: Option<NaiveDate>,
    /// Minutes.
    pub total_estimated_duration: Option<f64>,
    /// Kilometres.
    pub total_estimated_distance: Option<f64>,
    pub total_stops: i64,
    /// Ordered by `stop_order`.
    pub stops: Vec<Stop>,
}

/// Which calendar days an assignment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Schedule {
    /// Every week on a fixed weekday.
    Recurring(SystemDay),
    /// One explicit calendar day.
    Dated(NaiveDate),
    /// Defer to the route's own `route_date`.
    RouteDate,
}

impl Schedule {
    /// Build the schedule from the stored columns.
    /// Priority: recurring weekday, then explicit date, then route date.
    pub fn from_columns(
        is_recurring: bool,
        day_of_week: Option<SystemDay>,
        assigned_date: Option<NaiveDate>,
    ) -> Self {
        match (is_recurring, day_of_week, assigned_date) {
            (true, Some(day), _) => Schedule::Recurring(day),
            (_, _, Some(date)) => Schedule::Dated(date),
            _ => Schedule::RouteDate,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Schedule::Recurring(day) => format!("every {}", day),
            Schedule::Dated(date) => format!("on {}", date),
            Schedule::RouteDate => "route date".to_string(),
        }
    }
}

/// Route-to-person binding with the route already joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAssignment {
    pub id: i64,
    pub route_id: i64,
    pub assignee_id: i64,
    pub schedule: Schedule,
    pub route: Route,
}
