pub mod alert;
pub mod analysis;
pub mod classify;
pub mod monitor;
pub mod pattern;

pub use classify::{classify, title_for};
pub use monitor::{IncidentLogic, ScanContext, ScanOutcome};
pub use pattern::{PatternGroup, extract_pattern, group_errors, parse_log_lines};
