use super::resolver::DayPlan;
use crate::config::RouteCostConfig;
use crate::models::route::Route;
use crate::utils::round2;
use serde::Serialize;

/// Constants used to price a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostModel {
    pub fuel_consumption_per_100km: f64,
    pub fuel_price_per_liter: f64,
    pub hourly_rate: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            fuel_consumption_per_100km: 8.5,
            fuel_price_per_liter: 1.5,
            hourly_rate: 25.0,
        }
    }
}

impl From<&RouteCostConfig> for CostModel {
    fn from(cfg: &RouteCostConfig) -> Self {
        Self {
            fuel_consumption_per_100km: cfg.fuel_consumption_per_100km,
            fuel_price_per_liter: cfg.fuel_price_per_liter,
            hourly_rate: cfg.hourly_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteCost {
    pub fuel: f64,
    pub labor: f64,
    pub total: f64,
}

impl CostModel {
    pub fn fuel_cost(&self, distance_km: f64) -> f64 {
        (distance_km / 100.0) * self.fuel_consumption_per_100km * self.fuel_price_per_liter
    }

    pub fn labor_cost(&self, duration_minutes: f64) -> f64 {
        (duration_minutes / 60.0) * self.hourly_rate
    }

    /// Missing distance or duration count as zero.
    pub fn route_cost(&self, route: &Route) -> RouteCost {
        let fuel = self.fuel_cost(route.total_estimated_distance.unwrap_or(0.0));
        let labor = self.labor_cost(route.total_estimated_duration.unwrap_or(0.0));
        RouteCost {
            fuel,
            labor,
            total: fuel + labor,
        }
    }
}

/// `fuel_cost` with the default constants.
pub fn fuel_cost(distance_km: f64) -> f64 {
    CostModel::default().fuel_cost(distance_km)
}

/// `labor_cost` with the default constants.
pub fn labor_cost(duration_minutes: f64) -> f64 {
    CostModel::default().labor_cost(duration_minutes)
}

/// Aggregate over every route occurrence of a week.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeeklyStats {
    pub route_count: usize,
    pub total_stops: i64,
    pub total_distance: f64,
    pub total_duration: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub average_stops_per_route: f64,
}

impl WeeklyStats {
    pub fn from_routes<'a, I>(routes: I, model: &CostModel) -> Self
    where
        I: IntoIterator<Item = &'a Route>,
    {
        let mut stats = WeeklyStats::default();

        for route in routes {
            let cost = model.route_cost(route);
            stats.route_count += 1;
            stats.total_stops += route.total_stops;
            stats.total_distance += route.total_estimated_distance.unwrap_or(0.0);
            stats.total_duration += route.total_estimated_duration.unwrap_or(0.0);
            stats.fuel_cost += cost.fuel;
            stats.labor_cost += cost.labor;
        }

        stats.total_cost = stats.fuel_cost + stats.labor_cost;
        stats.average_stops_per_route = if stats.route_count == 0 {
            0.0
        } else {
            stats.total_stops as f64 / stats.route_count as f64
        };

        stats.round()
    }

    pub fn from_week(plan: &[DayPlan], model: &CostModel) -> Self {
        Self::from_routes(plan.iter().flat_map(|d| d.routes.iter()), model)
    }

    fn round(mut self) -> Self {
        self.total_distance = round2(self.total_distance);
        self.total_duration = round2(self.total_duration);
        self.fuel_cost = round2(self.fuel_cost);
        self.labor_cost = round2(self.labor_cost);
        self.total_cost = round2(self.total_cost);
        self.average_stops_per_route = round2(self.average_stops_per_route);
        self
    }
}
