use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
}

impl AttendanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::HalfDay => "half_day",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            "half_day" | "half-day" => Some(AttendanceStatus::HalfDay),
            _ => None,
        }
    }
}

/// One row per (user, date) of the `attendance` table.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub work_hours: f64,
    pub overtime_hours: f64,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn is_late(&self) -> bool {
        self.check_in_time.map(is_late_check_in).unwrap_or(false)
    }
}

/// Check-in counts as late strictly after 09:00.
pub fn is_late_check_in(t: NaiveTime) -> bool {
    t.hour() > 9 || (t.hour() == 9 && t.minute() > 0)
}
