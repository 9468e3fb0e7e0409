//! Chat-completions client used for incident analysis.

use super::http::describe_failure;
use crate::config::LlmConfig;
use crate::core::incident::analysis::{AnalysisRequest, Analyzer};
use crate::errors::{AppError, AppResult};
use crate::models::incident::{Analysis, AnalysisSource};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

pub struct LlmAnalyzer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Shape the model is asked to answer with.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    probable_cause: String,
    #[serde(default)]
    recommended_actions: Vec<String>,
    #[serde(default)]
    fix_confidence: f64,
    #[serde(default)]
    auto_fixable: bool,
}

impl LlmAnalyzer {
    pub fn new(client: Client, cfg: &LlmConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key,
        }
    }

    fn prompt(req: &AnalysisRequest) -> String {
        let services = if req.services.is_empty() {
            "unknown".to_string()
        } else {
            req.services.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let samples: Vec<String> = req.samples.iter().take(5).map(|s| format!("- {s}")).collect();

        format!(
            "Analyze this recurring production error.\n\
             Title: {}\n\
             Pattern: {}\n\
             Severity: {}\n\
             Occurrences: {}\n\
             Affected services: {}\n\
             Sample log lines:\n{}\n\n\
             Reply with JSON only, using exactly these keys:\n\
             {{\"probable_cause\": string, \"recommended_actions\": [string], \
             \"fix_confidence\": number 0-100, \"auto_fixable\": boolean}}",
            req.title,
            req.pattern,
            req.severity,
            req.occurrences,
            services,
            samples.join("\n")
        )
    }
}

/// Parse the model's answer. Code fences around the JSON are tolerated.
pub fn parse_analysis(content: &str) -> AppResult<Analysis> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let raw: RawAnalysis = serde_json::from_str(body)
        .map_err(|e| AppError::Analysis(format!("unexpected answer: {}", e)))?;

    if raw.probable_cause.trim().is_empty() {
        return Err(AppError::Analysis("empty probable_cause".into()));
    }

    Ok(Analysis {
        probable_cause: raw.probable_cause,
        recommended_actions: raw.recommended_actions,
        fix_confidence: raw.fix_confidence.round().clamp(0.0, 100.0) as u8,
        auto_fixable: raw.auto_fixable,
        source: AnalysisSource::Llm,
    })
}

impl Analyzer for LlmAnalyzer {
    fn analyze(&self, req: &AnalysisRequest) -> AppResult<Analysis> {
        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": "You are a site reliability engineer. Answer with JSON only." },
                { "role": "user", "content": Self::prompt(req) }
            ]
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(AppError::Analysis(describe_failure(status, &text)));
        }

        let chat: ChatResponse = resp.json()?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Analysis("no choices in response".into()))?;

        parse_analysis(&content)
    }
}
