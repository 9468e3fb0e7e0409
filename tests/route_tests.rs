use chrono::NaiveDate;
use rworkforce::core::routes::cost::{fuel_cost, labor_cost};
use rworkforce::core::routes::{CostModel, WeeklyStats, resolve_day_routes, resolve_week};
use rworkforce::models::route::{Route, RouteAssignment, RouteStatus, Schedule};
use rworkforce::models::weekday::{SystemDay, week_start};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn route(id: i64, date: Option<&str>, km: Option<f64>, minutes: Option<f64>) -> Route {
    Route {
        id,
        name: format!("Route {id}"),
        status: RouteStatus::Planned,
        route_date: date.map(d),
        total_estimated_duration: minutes,
        total_estimated_distance: km,
        total_stops: 2,
        stops: Vec::new(),
    }
}

fn assignment(id: i64, route: Route, schedule: Schedule) -> RouteAssignment {
    RouteAssignment {
        id,
        route_id: route.id,
        assignee_id: 1,
        schedule,
        route,
    }
}

#[test]
fn test_weekday_numbering_is_monday_first() {
    // 2025-03-03 is a Monday
    let names: Vec<_> = (0..7)
        .map(|i| SystemDay::of(d("2025-03-03") + chrono::Duration::days(i)))
        .map(|day| (day.number(), day.name()))
        .collect();

    assert_eq!(
        names,
        vec![
            (1, "Monday"),
            (2, "Tuesday"),
            (3, "Wednesday"),
            (4, "Thursday"),
            (5, "Friday"),
            (6, "Saturday"),
            (7, "Sunday"),
        ]
    );
}

#[test]
fn test_weekday_from_native_sunday_first() {
    assert_eq!(SystemDay::from_native(0).unwrap(), SystemDay::SUNDAY);
    assert_eq!(SystemDay::from_native(1).unwrap(), SystemDay::MONDAY);
    assert_eq!(SystemDay::from_native(6).unwrap().name(), "Saturday");
    assert!(SystemDay::from_native(7).is_err());
    assert!(SystemDay::new(0).is_err());
    assert!(SystemDay::new(8).is_err());
}

#[test]
fn test_weekday_from_native_maps_every_day() {
    let mapped: Vec<u8> = (0..=6)
        .map(|n| SystemDay::from_native(n).unwrap().number())
        .collect();
    assert_eq!(mapped, vec![7, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_week_start_is_monday() {
    assert_eq!(week_start(d("2025-03-09")), d("2025-03-03"));
    assert_eq!(week_start(d("2025-03-03")), d("2025-03-03"));
}

#[test]
fn test_resolver_matches_each_schedule_kind() {
    let wednesday = d("2025-03-05");
    let assignments = vec![
        assignment(1, route(1, None, None, None), Schedule::Recurring(SystemDay::new(3).unwrap())),
        assignment(2, route(2, None, None, None), Schedule::Dated(wednesday)),
        assignment(3, route(3, Some("2025-03-05"), None, None), Schedule::RouteDate),
        assignment(4, route(4, None, None, None), Schedule::RouteDate),
        assignment(5, route(5, None, None, None), Schedule::Recurring(SystemDay::new(4).unwrap())),
    ];

    let ids: Vec<i64> = resolve_day_routes(&assignments, SystemDay::of(wednesday), wednesday)
        .iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_recurring_assignment_matches_only_its_day() {
    let date = d("2025-03-03");
    for assigned in 1..=7 {
        let assignments = vec![assignment(
            1,
            route(1, None, None, None),
            Schedule::Recurring(SystemDay::new(assigned).unwrap()),
        )];
        for selected in 1..=7 {
            let found = resolve_day_routes(&assignments, SystemDay::new(selected).unwrap(), date);
            assert_eq!(
                found.len(),
                usize::from(assigned == selected),
                "assigned day {assigned}, selected day {selected}"
            );
        }
    }
}

#[test]
fn test_recurring_assignment_ignores_calendar_date() {
    let assignments = vec![assignment(
        1,
        route(1, Some("2020-01-01"), None, None),
        Schedule::Recurring(SystemDay::MONDAY),
    )];

    let plan = resolve_week(&assignments, d("2025-03-06"));
    assert_eq!(plan.len(), 7);
    assert_eq!(plan[0].date, d("2025-03-03"));
    assert_eq!(plan[0].routes.len(), 1);
    assert!(plan[1..].iter().all(|p| p.routes.is_empty()));
}

#[test]
fn test_fuel_and_labor_cost_defaults() {
    assert!((fuel_cost(100.0) - 12.75).abs() < 1e-9);
    assert!((labor_cost(90.0) - 37.5).abs() < 1e-9);
    assert_eq!(fuel_cost(0.0), 0.0);
    assert_eq!(labor_cost(0.0), 0.0);
}

#[test]
fn test_route_cost_treats_missing_estimates_as_zero() {
    let model = CostModel::default();
    let cost = model.route_cost(&route(1, None, None, None));
    assert_eq!(cost.total, 0.0);

    let cost = model.route_cost(&route(1, None, Some(100.0), Some(60.0)));
    assert!((cost.fuel - 12.75).abs() < 1e-9);
    assert!((cost.labor - 25.0).abs() < 1e-9);
    assert!((cost.total - 37.75).abs() < 1e-9);
}

#[test]
fn test_weekly_stats() {
    let model = CostModel::default();
    let routes = [
        route(1, None, Some(100.0), Some(60.0)),
        route(2, None, Some(50.0), None),
    ];
    let stats = WeeklyStats::from_routes(routes.iter(), &model);

    assert_eq!(stats.route_count, 2);
    assert_eq!(stats.total_stops, 4);
    assert_eq!(stats.total_distance, 150.0);
    assert_eq!(stats.fuel_cost, 19.13);
    assert_eq!(stats.labor_cost, 25.0);
    assert_eq!(stats.average_stops_per_route, 2.0);

    let empty = WeeklyStats::from_routes(std::iter::empty(), &model);
    assert_eq!(empty.average_stops_per_route, 0.0);
    assert_eq!(empty.total_cost, 0.0);
}
