/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::attendance::AttendanceStatus;
use crate::models::incident::Severity;

pub fn color_for_severity(sev: Severity) -> &'static str {
    match sev {
        Severity::Low => GREY,
        Severity::Medium => YELLOW,
        Severity::High => RED,
        Severity::Critical => MAGENTA,
    }
}

pub fn color_for_attendance(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => GREEN,
        AttendanceStatus::Late => YELLOW,
        AttendanceStatus::HalfDay => CYAN,
        AttendanceStatus::Absent => RED,
    }
}

/// Wrap a placeholder-looking value in grey.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" || value.trim() == "-" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
