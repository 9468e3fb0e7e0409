use crate::models::route::{Route, RouteAssignment, Schedule};
use crate::models::weekday::{SystemDay, week_dates};
use chrono::NaiveDate;
use serde::Serialize;

/// Routes of a single day of the week.
#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub day: SystemDay,
    pub routes: Vec<Route>,
}

/// Does this assignment apply to the selected day?
///
/// Recurring assignments compare the weekday number only; dated ones and
/// route-date fallbacks compare the calendar day. An assignment with no
/// usable date never matches.
pub fn applies_on(assignment: &RouteAssignment, day: SystemDay, date: NaiveDate) -> bool {
    match assignment.schedule {
        Schedule::Recurring(d) => d == day,
        Schedule::Dated(assigned) => assigned == date,
        Schedule::RouteDate => assignment.route.route_date == Some(date),
    }
}

/// Routes assigned for the selected day, in assignment order.
pub fn resolve_day_routes(
    assignments: &[RouteAssignment],
    day: SystemDay,
    date: NaiveDate,
) -> Vec<Route> {
    assignments
        .iter()
        .filter(|a| applies_on(a, day, date))
        .map(|a| a.route.clone())
        .collect()
}

/// Monday..Sunday plan of the week containing `date`.
pub fn resolve_week(assignments: &[RouteAssignment], date: NaiveDate) -> Vec<DayPlan> {
    week_dates(date)
        .into_iter()
        .map(|d| {
            let day = SystemDay::of(d);
            DayPlan {
                date: d,
                day,
                routes: resolve_day_routes(assignments, day, d),
            }
        })
        .collect()
}
