//! Payroll: hourly rates by role, regular/overtime split and net pay.

pub mod hours;
pub mod rates;
pub mod report;

pub use hours::HourSplit;
pub use report::{PayrollLine, PayrollLogic, PayrollReport, PayrollTotals};
