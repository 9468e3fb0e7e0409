use chrono::{NaiveDate, NaiveTime};
use rworkforce::core::payroll::hours::{split_day, split_records};
use rworkforce::core::payroll::rates::{compute_pay, hourly_rate, net_from_gross};
use rworkforce::core::payroll::report::{build_lines, totals};
use rworkforce::models::attendance::{AttendanceRecord, AttendanceStatus, is_late_check_in};
use rworkforce::models::organization::{OrgSettings, OvertimeMode};
use rworkforce::models::profile::{Profile, Role};

fn rec(user_id: i64, date: &str, hours: f64, overtime: f64) -> AttendanceRecord {
    AttendanceRecord {
        id: 0,
        user_id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        check_in_time: Some(NaiveTime::from_hms_opt(8, 30, 0).unwrap()),
        check_out_time: None,
        work_hours: hours,
        overtime_hours: overtime,
        status: AttendanceStatus::Present,
    }
}

fn profile(id: i64, name: &str, role: Role) -> Profile {
    Profile {
        id,
        organization_id: 1,
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role,
    }
}

#[test]
fn test_daily_split_at_eight_hours() {
    let split = split_day(&rec(1, "2025-03-03", 10.0, 0.0));
    assert_eq!(split.regular, 8.0);
    assert_eq!(split.overtime, 2.0);

    let split = split_day(&rec(1, "2025-03-03", 6.0, 0.0));
    assert_eq!(split.regular, 6.0);
    assert_eq!(split.overtime, 0.0);
}

#[test]
fn test_precomputed_overtime_is_trusted() {
    let split = split_day(&rec(1, "2025-03-03", 9.0, 3.0));
    assert_eq!(split.regular, 6.0);
    assert_eq!(split.overtime, 3.0);
}

#[test]
fn test_weekly_mode_uses_threshold_per_iso_week() {
    let mut settings = OrgSettings::defaults_for(1);
    settings.overtime_mode = OvertimeMode::Weekly;

    // five 9h days in one week, then one 9h day the following Monday
    let days = [
        "2025-03-03",
        "2025-03-04",
        "2025-03-05",
        "2025-03-06",
        "2025-03-07",
        "2025-03-10",
    ];
    let records: Vec<AttendanceRecord> = days
        .iter()
        .map(|d| rec(1, d, 9.0, 0.0))
        .collect();
    let refs: Vec<&AttendanceRecord> = records.iter().collect();

    let split = split_records(&refs, &settings);
    assert_eq!(split.regular, 49.0);
    assert_eq!(split.overtime, 5.0);
}

#[test]
fn test_role_rates() {
    let mut settings = OrgSettings::defaults_for(1);
    settings.member_rate = 10.0;
    assert_eq!(hourly_rate(Role::Member, &settings), 10.0);
    assert_eq!(hourly_rate(Role::Manager, &settings), 16.7);
    assert_eq!(hourly_rate(Role::Admin, &settings), 23.3);

    settings.manager_rate = Some(30.0);
    assert_eq!(hourly_rate(Role::Manager, &settings), 30.0);
}

#[test]
fn test_net_pay_after_deductions() {
    // 20% tax + 5% benefits
    let settings = OrgSettings::defaults_for(1);
    let (deductions, net) = net_from_gross(1000.0, &settings);
    assert_eq!(deductions, 250.0);
    assert_eq!(net, 750.0);
}

#[test]
fn test_overtime_paid_with_multiplier() {
    let settings = OrgSettings::defaults_for(1);
    let pay = compute_pay(8.0, 2.0, 20.0, &settings);
    assert_eq!(pay.regular_pay, 160.0);
    assert_eq!(pay.overtime_pay, 60.0);
    assert_eq!(pay.gross_pay, 220.0);
    assert_eq!(pay.net_pay, 165.0);
}

#[test]
fn test_employee_without_records_gets_zero_line() {
    let settings = OrgSettings::defaults_for(1);
    let employees = vec![profile(1, "Ann", Role::Member), profile(2, "Bob", Role::Manager)];
    let records = vec![rec(1, "2025-03-03", 10.0, 0.0)];

    let lines = build_lines(&employees, &records, &settings);
    assert_eq!(lines.len(), 2);

    let ann = &lines[0];
    assert_eq!(ann.days_worked, 1);
    assert_eq!(ann.regular_hours, 8.0);
    assert_eq!(ann.overtime_hours, 2.0);
    assert_eq!(ann.gross_pay, 165.0);

    let bob = &lines[1];
    assert_eq!(bob.days_worked, 0);
    assert_eq!(bob.gross_pay, 0.0);
    assert_eq!(bob.net_pay, 0.0);

    let t = totals(&lines);
    assert_eq!(t.gross_pay, 165.0);
    assert_eq!(t.overtime_hours, 2.0);
}

#[test]
fn test_late_after_nine() {
    assert!(!is_late_check_in(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
    assert!(is_late_check_in(NaiveTime::from_hms_opt(9, 1, 0).unwrap()));
    assert!(is_late_check_in(NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
}
