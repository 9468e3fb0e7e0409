//! Root-cause analysis: an optional remote analyzer with a fixed rule table
//! as fallback.

use crate::errors::AppResult;
use crate::models::incident::{Analysis, AnalysisSource, Severity};
use crate::ui::messages::warning;
use std::collections::BTreeSet;

/// What an analyzer gets to see about one incident.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub title: &'a str,
    pub pattern: &'a str,
    pub severity: Severity,
    pub occurrences: usize,
    pub services: &'a BTreeSet<String>,
    pub samples: &'a [String],
}

pub trait Analyzer {
    fn analyze(&self, req: &AnalysisRequest) -> AppResult<Analysis>;
}

struct Rule {
    keyword: &'static str,
    cause: &'static str,
    actions: &'static [&'static str],
    confidence: u8,
    auto_fixable: bool,
}

const RULES: [Rule; 5] = [
    Rule {
        keyword: "vercel",
        cause: "Serverless function on the hosting platform is failing or exceeding its limits",
        actions: &[
            "Check the function logs in the hosting dashboard",
            "Verify environment variables of the latest deployment",
            "Roll back to the previous deployment if the error started after a release",
        ],
        confidence: 60,
        auto_fixable: false,
    },
    Rule {
        keyword: "supabase",
        cause: "Backend database API rejected the request or is unavailable",
        actions: &[
            "Check the backend status page",
            "Verify row level security policies for the affected table",
            "Confirm the service key has not been rotated",
        ],
        confidence: 55,
        auto_fixable: false,
    },
    Rule {
        keyword: "enoent",
        cause: "A file or directory expected at runtime is missing",
        actions: &[
            "Make sure the file is included in the build output",
            "Create the missing directory at startup",
        ],
        confidence: 70,
        auto_fixable: true,
    },
    Rule {
        keyword: "timeout",
        cause: "An upstream dependency is slow or unreachable",
        actions: &[
            "Check latency of the upstream service",
            "Increase the client timeout or add caching",
            "Review recent traffic spikes",
        ],
        confidence: 50,
        auto_fixable: false,
    },
    Rule {
        keyword: "auth",
        cause: "Expired or invalid credentials or session tokens",
        actions: &[
            "Rotate the affected API keys",
            "Check token expiry and refresh logic",
        ],
        confidence: 65,
        auto_fixable: false,
    },
];

/// Rule-table analysis keyed by keywords of the incident title.
pub fn rule_based(title: &str) -> Analysis {
    let lower = title.to_lowercase();
    match RULES.iter().find(|r| lower.contains(r.keyword)) {
        Some(rule) => Analysis {
            probable_cause: rule.cause.to_string(),
            recommended_actions: rule.actions.iter().map(|a| a.to_string()).collect(),
            fix_confidence: rule.confidence,
            auto_fixable: rule.auto_fixable,
            source: AnalysisSource::Rules,
        },
        None => Analysis {
            probable_cause: "Unclassified recurring error".to_string(),
            recommended_actions: vec![
                "Inspect the sample log lines attached to the incident".to_string(),
                "Correlate the first occurrence with recent deployments".to_string(),
            ],
            fix_confidence: 30,
            auto_fixable: false,
            source: AnalysisSource::Rules,
        },
    }
}

/// Ask the analyzer when there is one; any failure degrades to the rule
/// table. Never fails.
pub fn analyze_or_fallback(analyzer: Option<&dyn Analyzer>, req: &AnalysisRequest) -> Analysis {
    let Some(analyzer) = analyzer else {
        return rule_based(req.title);
    };

    match analyzer.analyze(req) {
        Ok(analysis) => analysis,
        Err(e) => {
            warning(format!("AI analysis unavailable, using rules: {}", e));
            rule_based(req.title)
        }
    }
}
