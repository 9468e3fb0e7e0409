mod common;
use chrono::{NaiveDate, NaiveTime};
use common::{init_db_with_staff, rwf, setup_test_db, temp_out};
use rworkforce::export::{AttendanceExport, ExportRow, parse_range, write_csv};
use rworkforce::models::attendance::{AttendanceRecord, AttendanceStatus};
use std::collections::HashMap;
use std::fs;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_csv_quotes_values_with_commas() {
    let records = vec![AttendanceRecord {
        id: 1,
        user_id: 7,
        date: d("2025-03-03"),
        check_in_time: NaiveTime::from_hms_opt(8, 30, 0),
        check_out_time: NaiveTime::from_hms_opt(17, 0, 0),
        work_hours: 8.5,
        overtime_hours: 0.5,
        status: AttendanceStatus::Present,
    }];
    let names = HashMap::from([(7, "Doe, \"JD\" Jane".to_string())]);
    let rows = AttendanceExport::from_records(&records, &names);

    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_csv(&mut wtr, &rows).unwrap();
    let bytes = wtr.into_inner().unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\"Doe, \"\"JD\"\" Jane\""));

    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, AttendanceExport::headers());
    let first = rdr.records().next().unwrap().unwrap();
    assert_eq!(&first[2], "Doe, \"JD\" Jane");
    assert_eq!(&first[4], "08:30");
}

#[test]
fn test_csv_header_only_when_empty() {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_csv::<_, AttendanceExport>(&mut wtr, &[]).unwrap();
    let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
    assert_eq!(text.trim_end(), AttendanceExport::headers().join(","));
}

#[test]
fn test_parse_range_shapes() {
    assert_eq!(parse_range("2024").unwrap(), (d("2024-01-01"), d("2024-12-31")));
    assert_eq!(parse_range("2024-02").unwrap(), (d("2024-02-01"), d("2024-02-29")));
    assert_eq!(parse_range("2025-03-03").unwrap(), (d("2025-03-03"), d("2025-03-03")));
    assert_eq!(
        parse_range("2024-11:2025-01").unwrap(),
        (d("2024-11-01"), d("2025-01-31"))
    );
    assert!(parse_range("2025-03:2025").is_err());
    assert!(parse_range("2025-05:2025-01").is_err());
    assert!(parse_range("2025-13").is_err());
    assert!(parse_range("March").is_err());
}

#[test]
fn test_export_attendance_csv_with_range() {
    let db_path = setup_test_db("export_attendance_csv");
    init_db_with_staff(&db_path);

    for (date, member) in [("2025-03-03", "1"), ("2025-04-01", "2")] {
        rwf()
            .args([
                "--db", &db_path, "attendance", "record", member, date, "--in", "08:00", "--out",
                "16:00",
            ])
            .assert()
            .success();
    }

    let out = temp_out("export_attendance_csv", "csv");
    rwf()
        .args([
            "--db", &db_path, "export", "attendance", "--format", "csv", "--file", &out,
            "--range", "2025-03",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.contains("2025-03-03"));
    assert!(content.contains("Ann"));
    assert!(!content.contains("2025-04-01"));
}

#[test]
fn test_export_payroll_json() {
    let db_path = setup_test_db("export_payroll_json");
    init_db_with_staff(&db_path);

    rwf()
        .args([
            "--db", &db_path, "attendance", "record", "1", "2025-03-03", "--hours", "10",
        ])
        .assert()
        .success();

    let out = temp_out("export_payroll_json", "json");
    rwf()
        .args([
            "--db", &db_path, "export", "payroll", "--format", "json", "--file", &out,
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["employee"], "Ann");
    assert_eq!(rows[0]["overtime_hours"], 2.0);
    assert_eq!(rows[1]["gross_pay"], 0.0);
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("export_relative_path");
    init_db_with_staff(&db_path);

    rwf()
        .args([
            "--db", &db_path, "export", "incidents", "--file", "relative.csv",
        ])
        .assert()
        .failure();
}

#[test]
fn test_export_xlsx() {
    let db_path = setup_test_db("export_incidents_xlsx");
    init_db_with_staff(&db_path);

    let out = temp_out("export_incidents_xlsx", "xlsx");
    rwf()
        .args([
            "--db", &db_path, "export", "incidents", "--format", "xlsx", "--file", &out,
        ])
        .assert()
        .success();

    assert!(fs::metadata(&out).map(|m| m.len() > 0).unwrap_or(false));
}
