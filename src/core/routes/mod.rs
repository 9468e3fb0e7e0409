//! Route planning: which routes a member drives on a given day, and what
//! they cost.

pub mod cost;
pub mod planner;
pub mod resolver;

pub use cost::{CostModel, RouteCost, WeeklyStats};
pub use resolver::{DayPlan, resolve_day_routes, resolve_week};
