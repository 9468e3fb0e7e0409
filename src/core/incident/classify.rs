use crate::models::incident::Severity;

const CRITICAL_KEYWORDS: [&str; 3] = ["critical", "outage", "database"];

/// Severity from the occurrence count, escalated to critical when the
/// pattern mentions a critical keyword (case-insensitive), whatever the count.
pub fn classify(pattern: &str, count: usize) -> Severity {
    let lower = pattern.to_lowercase();
    if CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Severity::Critical;
    }

    if count > 10 {
        Severity::High
    } else if count > 5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Known error families, matched in order against the pattern text.
pub(crate) const TITLE_RULES: [(&str, &str); 6] = [
    ("vercel", "Vercel API error"),
    ("supabase", "Supabase error"),
    ("enoent", "ENOENT file not found"),
    ("timeout", "Request timeout"),
    ("timed out", "Request timeout"),
    ("auth", "Authentication failure"),
];

/// Human label for a pattern, with the occurrence count.
pub fn title_for(pattern: &str, count: usize) -> String {
    let lower = pattern.to_lowercase();
    let label = TITLE_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, label)| *label)
        .unwrap_or("Recurring error");

    format!("{} ({} occurrence{})", label, count, if count == 1 { "" } else { "s" })
}
