//! Error-message normalization and grouping.

use crate::models::incident::LogEntry;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|[\s'"(=:])/[^\s'")]+"#).unwrap());
static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce a log message to its error "shape".
///
/// UUIDs, URLs and paths must be replaced before digit runs.
pub fn extract_pattern(message: &str) -> String {
    let s = UUID_RE.replace_all(message, "UUID");
    let s = URL_RE.replace_all(&s, "URL");
    let s = PATH_RE.replace_all(&s, "${1}PATH");
    let s = NUM_RE.replace_all(&s, "NUM");
    let s = WS_RE.replace_all(&s, " ");
    s.trim().to_string()
}

/// Error entries sharing one pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternGroup {
    pub pattern: String,
    pub count: usize,
    pub services: BTreeSet<String>,
    /// Raw messages, oldest first.
    pub samples: Vec<String>,
}

/// Bucket error/critical entries by pattern. Lower levels are ignored.
/// The result is ordered by descending count, then pattern.
pub fn group_errors(entries: &[LogEntry]) -> Vec<PatternGroup> {
    let mut groups: BTreeMap<String, PatternGroup> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.level.is_error()) {
        let pattern = extract_pattern(&entry.message);
        let group = groups
            .entry(pattern.clone())
            .or_insert_with(|| PatternGroup {
                pattern,
                count: 0,
                services: BTreeSet::new(),
                samples: Vec::new(),
            });

        group.count += 1;
        if let Some(service) = entry.service.as_deref().filter(|s| !s.is_empty()) {
            group.services.insert(service.to_string());
        }
        group.samples.push(entry.message.clone());
    }

    let mut out: Vec<PatternGroup> = groups.into_values().collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pattern.cmp(&b.pattern)));
    out
}

/// Parse a JSON-lines log. Blank lines are skipped; malformed lines are
/// counted and reported back to the caller.
pub fn parse_log_lines(text: &str) -> (Vec<LogEntry>, usize) {
    let mut entries = Vec::new();
    let mut rejected = 0;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) => rejected += 1,
        }
    }

    (entries, rejected)
}
