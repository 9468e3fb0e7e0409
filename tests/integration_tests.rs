mod common;
use common::{config_home, init_db_with_staff, rwf, setup_test_db, temp_file, temp_out};
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_default_organization() {
    let db_path = setup_test_db("init_default_org");

    rwf()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rwf()
        .args(["--db", &db_path, "org", "show"])
        .assert()
        .success()
        .stdout(contains("Default organization"))
        .stdout(contains("overtime_mode"));
}

#[test]
fn test_employee_add_and_list() {
    let db_path = setup_test_db("employee_add_list");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("Ann"))
        .stdout(contains("Bob"))
        .stdout(contains("manager"));

    rwf()
        .args([
            "--db", &db_path, "employee", "add", "Eve", "--email", "eve@example.com", "--role",
            "boss",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid role"));
}

#[test]
fn test_check_in_late_then_check_out_and_payroll() {
    let db_path = setup_test_db("attendance_flow");
    init_db_with_staff(&db_path);

    rwf()
        .args([
            "--db", &db_path, "attendance", "checkin", "1", "--date", "2025-03-03", "--time",
            "09:15",
        ])
        .assert()
        .success()
        .stdout(contains("late"));

    // second check-in the same day is rejected
    rwf()
        .args([
            "--db", &db_path, "attendance", "checkin", "1", "--date", "2025-03-03", "--time",
            "09:30",
        ])
        .assert()
        .failure();

    rwf()
        .args([
            "--db", &db_path, "attendance", "checkout", "1", "--date", "2025-03-03", "--time",
            "19:15",
        ])
        .assert()
        .success()
        .stdout(contains("10.00h"));

    rwf()
        .args(["--db", &db_path, "attendance", "list", "--range", "2025-03"])
        .assert()
        .success()
        .stdout(contains("Ann"))
        .stdout(contains("late"));

    rwf()
        .args(["--db", &db_path, "payroll", "--range", "2025-03"])
        .assert()
        .success()
        .stdout(contains("Ann"))
        .stdout(contains("Bob"))
        .stdout(contains("$165.00"));
}

#[test]
fn test_check_out_before_check_in_fails() {
    let db_path = setup_test_db("attendance_bad_checkout");
    init_db_with_staff(&db_path);

    rwf()
        .args([
            "--db", &db_path, "attendance", "checkin", "2", "--date", "2025-03-03", "--time",
            "08:00",
        ])
        .assert()
        .success();

    rwf()
        .args([
            "--db", &db_path, "attendance", "checkout", "2", "--date", "2025-03-03", "--time",
            "07:00",
        ])
        .assert()
        .failure()
        .stderr(contains("not after check-in"));
}

#[test]
fn test_weekly_overtime_setting() {
    let db_path = setup_test_db("payroll_weekly");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "org", "set", "overtime_mode", "weekly"])
        .assert()
        .success();

    rwf()
        .args(["--db", &db_path, "org", "set", "overtime_mode", "monthly"])
        .assert()
        .failure();

    // 10h on a single day is all regular in weekly mode
    rwf()
        .args([
            "--db", &db_path, "attendance", "record", "1", "2025-03-03", "--hours", "10",
        ])
        .assert()
        .success();

    let out = temp_out("payroll_weekly", "csv");
    rwf()
        .args(["--db", &db_path, "payroll", "--file", &out])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read payroll csv");
    assert!(content.contains("Ann,member,1,0,10.0,0.0"));
}

#[test]
fn test_route_assignment_and_day_plan() {
    let db_path = setup_test_db("route_day_plan");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "outlet", "add", "Corner shop", "--address", "Main St 1"])
        .assert()
        .success();

    rwf()
        .args([
            "--db", &db_path, "route", "add", "North loop", "--km", "100", "--minutes", "60",
        ])
        .assert()
        .success();

    rwf()
        .args(["--db", &db_path, "route", "stop", "1", "1", "--minutes", "20"])
        .assert()
        .success();

    // every Wednesday
    rwf()
        .args(["--db", &db_path, "route", "assign", "1", "1", "--day", "3"])
        .assert()
        .success()
        .stdout(contains("every Wednesday"));

    rwf()
        .args(["--db", &db_path, "route", "day", "1", "--date", "2025-03-05"])
        .assert()
        .success()
        .stdout(contains("North loop"))
        .stdout(contains("Corner shop"))
        .stdout(contains("$37.75"));

    rwf()
        .args(["--db", &db_path, "route", "day", "1", "--date", "2025-03-06"])
        .assert()
        .success()
        .stdout(contains("No routes."));

    rwf()
        .args(["--db", &db_path, "route", "week", "1", "--date", "2025-03-06"])
        .assert()
        .success()
        .stdout(contains("Wed 2025-03-05  North loop"));

    rwf()
        .args(["--db", &db_path, "route", "assign", "1", "1", "--day", "8"])
        .assert()
        .failure();
}

#[test]
fn test_incident_scan_list_resolve() {
    let db_path = setup_test_db("incident_scan");
    init_db_with_staff(&db_path);

    let mut log = String::new();
    for i in 0..4 {
        log.push_str(&format!(
            "{{\"level\":\"error\",\"message\":\"Request timed out after {}ms\",\"service\":\"api\"}}\n",
            1000 + i
        ));
    }
    log.push_str("{\"level\":\"info\",\"message\":\"all good\"}\n");
    let file = temp_file("incident_scan_log", &log);

    rwf()
        .args(["--db", &db_path, "incident", "scan", "--file", &file])
        .assert()
        .success()
        .stdout(contains("Request timeout (4 occurrences)"));

    rwf()
        .args(["--db", &db_path, "incident", "list"])
        .assert()
        .success()
        .stdout(contains("investigating"));

    rwf()
        .args(["--db", &db_path, "incident", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Request timed out after NUMms"));

    rwf()
        .args(["--db", &db_path, "incident", "resolve", "1"])
        .assert()
        .success();

    rwf()
        .args(["--db", &db_path, "incident", "resolve", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid transition"));

    rwf()
        .args(["--db", &db_path, "incident", "list"])
        .assert()
        .success()
        .stdout(contains("No incidents."));
}

#[test]
fn test_notify_render_and_events() {
    rwf()
        .args(["notify", "events"])
        .assert()
        .success()
        .stdout(contains("route_assigned"))
        .stdout(contains("incident_id"));

    rwf()
        .args([
            "notify", "render", "--event", "check_in", "--dialect", "discord", "--var",
            "name=Ann", "--var", "date=2025-03-03",
        ])
        .assert()
        .success()
        .stdout(contains("**Ann** checked in on 2025-03-03 at {{time}}"))
        .stdout(contains("embeds"));

    rwf()
        .args(["notify", "render", "--event", "payday"])
        .assert()
        .failure();
}

#[test]
fn test_notify_send_without_webhooks_warns() {
    let db_path = setup_test_db("notify_send_none");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "notify", "send", "--event", "check_in"])
        .assert()
        .success()
        .stdout(contains("No webhook configured"));
}

#[test]
fn test_form_create_validate_submit() {
    let db_path = setup_test_db("form_flow");
    init_db_with_staff(&db_path);

    let def = temp_file(
        "form_flow_def",
        r#"{
            "title": "Shelf check",
            "fields": [
                { "id": "facings", "type": "number", "label": "Facings", "required": true,
                  "settings": { "min": 0 } },
                { "id": "issues", "type": "checkbox", "label": "Issues", "options": ["dust", "gaps"] }
            ]
        }"#,
    );
    rwf()
        .args(["--db", &db_path, "form", "create", "--file", &def])
        .assert()
        .success()
        .stdout(contains("Form #1"));

    rwf()
        .args(["--db", &db_path, "form", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Facings *"));

    let bad = temp_file("form_flow_bad", r#"{ "facings": -1, "issues": ["mold"] }"#);
    rwf()
        .args(["--db", &db_path, "form", "validate", "--form", "1", "--answers", &bad])
        .assert()
        .failure()
        .stderr(contains("Validation failed on 2 field(s)"));

    rwf()
        .args(["--db", &db_path, "outlet", "add", "Kiosk"])
        .assert()
        .success();
    rwf()
        .args(["--db", &db_path, "visit", "checkin", "1", "1", "--at", "2025-03-03 10:00"])
        .assert()
        .success();

    let good = temp_file("form_flow_good", r#"{ "facings": 4, "issues": ["gaps"] }"#);
    rwf()
        .args([
            "--db", &db_path, "form", "submit", "--form", "1", "--member", "1", "--answers",
            &good, "--visit", "1",
        ])
        .assert()
        .success()
        .stdout(contains("Response #1"));

    rwf()
        .args(["--db", &db_path, "form", "responses", "1"])
        .assert()
        .success()
        .stdout(contains("gaps"));

    rwf()
        .args(["--db", &db_path, "visit", "list", "--member", "1"])
        .assert()
        .success()
        .stdout(contains("#1"));
}

#[test]
fn test_log_and_backup() {
    let db_path = setup_test_db("log_backup");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("employee_add"));

    let out = temp_out("log_backup", "zip");
    rwf()
        .args(["--db", &db_path, "backup", "--file", &out, "--compress", "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    assert!(fs::metadata(&out).map(|m| m.len() > 0).unwrap_or(false));

    rwf()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_missing_sendgrid_key_only_disables_email() {
    let db_path = setup_test_db("sendgrid_no_key");
    init_db_with_staff(&db_path);
    let home = config_home(
        "sendgrid_no_key",
        &format!("database: {}\nemail:\n  provider: sendgrid\n", db_path),
    );

    rwf()
        .env("RWORKFORCE_HOME", &home)
        .args(["outlet", "list"])
        .assert()
        .success()
        .stdout(contains("E-mail alerts disabled"))
        .stdout(contains("SENDGRID_API_KEY"));

    rwf()
        .env("RWORKFORCE_HOME", &home)
        .args([
            "attendance", "checkin", "1", "--date", "2025-03-03", "--time", "08:30",
        ])
        .assert()
        .success()
        .stdout(contains("checked in at 08:30"));
}

#[test]
fn test_config_without_database_key_loads_defaults() {
    let db_path = setup_test_db("config_no_database");
    init_db_with_staff(&db_path);
    let home = config_home("config_no_database", "currency_symbol: \"EUR \"\n");

    rwf()
        .env("RWORKFORCE_HOME", &home)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("- database"));

    rwf()
        .env("RWORKFORCE_HOME", &home)
        .args(["--db", &db_path, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("Ann"));
}

#[test]
fn test_commands_stay_inside_the_active_organization() {
    let db_path = setup_test_db("tenant_scope");
    init_db_with_staff(&db_path);

    rwf()
        .args(["--db", &db_path, "org", "add", "Branch"])
        .assert()
        .success()
        .stdout(contains("Organization #2"));

    // #3 Carl works for organization 2
    rwf()
        .args([
            "--db", &db_path, "--org", "2", "employee", "add", "Carl", "--email",
            "carl@example.com",
        ])
        .assert()
        .success();

    rwf()
        .args([
            "--db", &db_path, "attendance", "checkin", "3", "--date", "2025-03-03", "--time",
            "08:00",
        ])
        .assert()
        .failure()
        .stderr(contains("Employee not found: 3"));

    rwf()
        .args([
            "--db", &db_path, "attendance", "record", "3", "2025-03-03", "--hours", "8",
        ])
        .assert()
        .failure()
        .stderr(contains("Employee not found: 3"));

    rwf()
        .args([
            "--db", &db_path, "--org", "2", "attendance", "checkin", "3", "--date",
            "2025-03-03", "--time", "08:00",
        ])
        .assert()
        .success();

    rwf()
        .args(["--db", &db_path, "route", "add", "North loop"])
        .assert()
        .success();

    rwf()
        .args(["--db", &db_path, "route", "assign", "1", "3", "--day", "1"])
        .assert()
        .failure()
        .stderr(contains("Employee not found: 3"));

    rwf()
        .args(["--db", &db_path, "--org", "2", "route", "assign", "1", "3", "--day", "1"])
        .assert()
        .failure()
        .stderr(contains("Route not found: 1"));

    rwf()
        .args(["--db", &db_path, "route", "assign", "1", "1", "--day", "1"])
        .assert()
        .success();
}
