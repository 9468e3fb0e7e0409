//! Field validation keyed by field type.
//!
//! One rule set serves every caller: the `required` check first, then the
//! per-type format rules for any value that is present.

use crate::models::form::{Answers, FieldType, FieldValue, FormDefinition, FormField, TextFormat};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{5,18}[0-9]$").unwrap());

pub const DEFAULT_RATING_SCALE: u32 = 5;

pub const DEFAULT_LIKERT: [&str; 5] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];

/// Field id -> message. Empty means the answers are valid.
pub type ValidationErrors = BTreeMap<String, String>;

/// Options of a likert field, falling back to the standard 5-point scale.
pub fn likert_options(field: &FormField) -> Vec<String> {
    if field.options.is_empty() {
        DEFAULT_LIKERT.iter().map(|s| s.to_string()).collect()
    } else {
        field.options.clone()
    }
}

fn is_missing(value: Option<&FieldValue>) -> bool {
    value.is_none_or(FieldValue::is_empty)
}

fn in_options(field: &FormField, v: &str) -> bool {
    field.options.is_empty() || field.options.iter().any(|o| o == v)
}

fn text_of(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn check_text(field: &FormField, value: &FieldValue) -> Option<String> {
    let Some(s) = text_of(value) else {
        return Some(format!("{} must be text", field.label));
    };
    let len = s.chars().count();
    let set = &field.settings;

    if let Some(min) = set.min_length
        && len < min
    {
        return Some(format!("{} must be at least {} characters", field.label, min));
    }
    if let Some(max) = set.max_length
        && len > max
    {
        return Some(format!("{} must be at most {} characters", field.label, max));
    }
    if set.format == Some(TextFormat::Phone) && !PHONE_RE.is_match(s.trim()) {
        return Some(format!("{} must be a valid phone number", field.label));
    }
    if let Some(pattern) = &set.pattern {
        match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(re) if re.is_match(&s) => {}
            Ok(_) => return Some(format!("{} has an invalid format", field.label)),
            Err(_) => return Some(format!("{} has an unusable pattern", field.label)),
        }
    }
    None
}

fn check_number(field: &FormField, value: &FieldValue) -> Option<String> {
    let Some(n) = value.as_number() else {
        return Some(format!("{} must be a number", field.label));
    };
    if let Some(min) = field.settings.min
        && n < min
    {
        return Some(format!("{} must be at least {}", field.label, min));
    }
    if let Some(max) = field.settings.max
        && n > max
    {
        return Some(format!("{} must be at most {}", field.label, max));
    }
    None
}

fn check_choice(field: &FormField, value: &FieldValue) -> Option<String> {
    match value.as_text() {
        Some(v) if in_options(field, v) => None,
        Some(v) => Some(format!("'{}' is not an option of {}", v, field.label)),
        None => Some(format!("{} expects a single option", field.label)),
    }
}

fn check_checkbox(field: &FormField, value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Bool(_) if field.options.is_empty() => None,
        FieldValue::List(values) => values
            .iter()
            .find(|v| !in_options(field, v))
            .map(|v| format!("'{}' is not an option of {}", v, field.label)),
        FieldValue::Text(v) if in_options(field, v) => None,
        FieldValue::Text(v) => Some(format!("'{}' is not an option of {}", v, field.label)),
        _ => Some(format!("{} expects a list of options", field.label)),
    }
}

fn check_rating(field: &FormField, value: &FieldValue) -> Option<String> {
    let scale = field.settings.scale.unwrap_or(DEFAULT_RATING_SCALE);
    match value.as_number() {
        Some(n) if n.fract() == 0.0 && n >= 1.0 && n <= f64::from(scale) => None,
        _ => Some(format!("{} must be a whole number from 1 to {}", field.label, scale)),
    }
}

fn check_likert(field: &FormField, value: &FieldValue) -> Option<String> {
    let options = likert_options(field);
    match value.as_text() {
        Some(v) if options.iter().any(|o| o == v) => None,
        _ => Some(format!("{} must be one of: {}", field.label, options.join(", "))),
    }
}

/// Message for one field, or `None` when the value is acceptable.
pub fn validate_field(field: &FormField, value: Option<&FieldValue>) -> Option<String> {
    if field.field_type.is_decorative() {
        return None;
    }

    if is_missing(value) {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    }
    let value = value?;

    match field.field_type {
        FieldType::Text | FieldType::Textarea => check_text(field, value),
        FieldType::Email => match value.as_text() {
            Some(s) if EMAIL_RE.is_match(s.trim()) => None,
            _ => Some(format!("{} must be a valid email address", field.label)),
        },
        FieldType::Number => check_number(field, value),
        FieldType::Select | FieldType::Radio => check_choice(field, value),
        FieldType::Checkbox => check_checkbox(field, value),
        FieldType::Date => match value.as_text() {
            Some(s) if NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok() => None,
            _ => Some(format!("{} must be a date (YYYY-MM-DD)", field.label)),
        },
        FieldType::File => match value {
            FieldValue::Text(_) | FieldValue::List(_) => None,
            _ => Some(format!("{} expects a file reference", field.label)),
        },
        FieldType::Rating => check_rating(field, value),
        FieldType::Likert => check_likert(field, value),
        FieldType::Section | FieldType::Html => None,
    }
}

/// Validate a full set of answers against a form.
pub fn validate(def: &FormDefinition, answers: &Answers) -> ValidationErrors {
    def.fields
        .iter()
        .filter_map(|f| validate_field(f, answers.get(&f.id)).map(|msg| (f.id.clone(), msg)))
        .collect()
}

/// Structural checks on a form definition before it is stored.
pub fn check_definition(def: &FormDefinition) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let mut seen = HashSet::new();

    if def.title.trim().is_empty() {
        errors.insert("title".into(), "Form title is required".into());
    }

    for f in &def.fields {
        if f.id.trim().is_empty() {
            errors.insert(format!("{}:id", f.label), "Field id is required".into());
            continue;
        }
        if !seen.insert(f.id.as_str()) {
            errors.insert(f.id.clone(), format!("Duplicate field id '{}'", f.id));
            continue;
        }
        if matches!(f.field_type, FieldType::Select | FieldType::Radio) && f.options.is_empty() {
            errors.insert(f.id.clone(), format!("{} needs at least one option", f.label));
            continue;
        }
        if let Some(p) = &f.settings.pattern
            && Regex::new(p).is_err()
        {
            errors.insert(f.id.clone(), format!("Invalid pattern '{}'", p));
            continue;
        }
        if let (Some(min), Some(max)) = (f.settings.min, f.settings.max)
            && min > max
        {
            errors.insert(f.id.clone(), format!("min {} is greater than max {}", min, max));
        }
    }

    errors
}
