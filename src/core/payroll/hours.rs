use crate::models::attendance::AttendanceRecord;
use crate::models::organization::{OrgSettings, OvertimeMode};
use chrono::Datelike;
use std::collections::HashMap;
use std::ops::AddAssign;

/// Regular working hours per day before overtime starts (daily mode).
pub const DAILY_REGULAR_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourSplit {
    pub regular: f64,
    pub overtime: f64,
}

impl AddAssign for HourSplit {
    fn add_assign(&mut self, rhs: Self) {
        self.regular += rhs.regular;
        self.overtime += rhs.overtime;
    }
}

impl HourSplit {
    pub fn total(&self) -> f64 {
        self.regular + self.overtime
    }
}

/// A precomputed overtime value on the record wins over any threshold.
fn precomputed(rec: &AttendanceRecord) -> Option<HourSplit> {
    (rec.overtime_hours > 0.0).then(|| HourSplit {
        regular: (rec.work_hours - rec.overtime_hours).max(0.0),
        overtime: rec.overtime_hours,
    })
}

/// Split of a single day with the 8-hour daily cutoff.
pub fn split_day(rec: &AttendanceRecord) -> HourSplit {
    precomputed(rec).unwrap_or_else(|| {
        let worked = rec.work_hours.max(0.0);
        HourSplit {
            regular: worked.min(DAILY_REGULAR_HOURS),
            overtime: (worked - DAILY_REGULAR_HOURS).max(0.0),
        }
    })
}

/// Split of all records of one employee according to the org overtime mode.
pub fn split_records(records: &[&AttendanceRecord], settings: &OrgSettings) -> HourSplit {
    match settings.overtime_mode {
        OvertimeMode::Daily => {
            let mut total = HourSplit::default();
            for rec in records {
                total += split_day(rec);
            }
            total
        }
        OvertimeMode::Weekly => split_weekly(records, settings.overtime_threshold),
    }
}

/// Hours accumulate per ISO week; whatever exceeds `threshold` in a week is
/// overtime. Records are processed in date order.
fn split_weekly(records: &[&AttendanceRecord], threshold: f64) -> HourSplit {
    let mut sorted: Vec<&AttendanceRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.date);

    let mut regular_in_week: HashMap<(i32, u32), f64> = HashMap::new();
    let mut total = HourSplit::default();

    for rec in sorted {
        let iso = rec.date.iso_week();
        let used = regular_in_week.entry((iso.year(), iso.week())).or_insert(0.0);

        let split = match precomputed(rec) {
            Some(split) => split,
            None => {
                let worked = rec.work_hours.max(0.0);
                let available = (threshold - *used).max(0.0);
                let regular = worked.min(available);
                HourSplit {
                    regular,
                    overtime: worked - regular,
                }
            }
        };

        *used += split.regular;
        total += split;
    }

    total
}
