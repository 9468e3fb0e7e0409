//! Text rendering of form definitions.

use super::validator::{DEFAULT_RATING_SCALE, likert_options};
use crate::models::form::{FieldType, Form, FormField, TextFormat};
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::bold;
use std::fmt::Write;

/// Input control a field is presented with.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    TextInput { input_type: &'static str },
    TextArea,
    NumberInput { min: Option<f64>, max: Option<f64> },
    Dropdown { options: Vec<String> },
    RadioGroup { options: Vec<String> },
    CheckboxGroup { options: Vec<String> },
    DatePicker,
    FileUpload,
    Stars { scale: u32 },
    LikertScale { options: Vec<String> },
    Heading,
    StaticHtml { content: String },
}

pub fn widget_for(field: &FormField) -> Widget {
    match field.field_type {
        FieldType::Text => Widget::TextInput {
            input_type: match field.settings.format {
                Some(TextFormat::Phone) => "tel",
                None => "text",
            },
        },
        FieldType::Email => Widget::TextInput { input_type: "email" },
        FieldType::Textarea => Widget::TextArea,
        FieldType::Number => Widget::NumberInput {
            min: field.settings.min,
            max: field.settings.max,
        },
        FieldType::Select => Widget::Dropdown {
            options: field.options.clone(),
        },
        FieldType::Radio => Widget::RadioGroup {
            options: field.options.clone(),
        },
        FieldType::Checkbox => Widget::CheckboxGroup {
            options: field.options.clone(),
        },
        FieldType::Date => Widget::DatePicker,
        FieldType::File => Widget::FileUpload,
        FieldType::Rating => Widget::Stars {
            scale: field.settings.scale.unwrap_or(DEFAULT_RATING_SCALE),
        },
        FieldType::Likert => Widget::LikertScale {
            options: likert_options(field),
        },
        FieldType::Section => Widget::Heading,
        FieldType::Html => Widget::StaticHtml {
            content: field.settings.content.clone().unwrap_or_default(),
        },
    }
}

impl Widget {
    /// One-line description used in previews.
    pub fn describe(&self) -> String {
        match self {
            Widget::TextInput { input_type } => format!("[{} input]", input_type),
            Widget::TextArea => "[multi-line text]".to_string(),
            Widget::NumberInput { min, max } => match (min, max) {
                (Some(a), Some(b)) => format!("[number {}..{}]", a, b),
                (Some(a), None) => format!("[number >= {}]", a),
                (None, Some(b)) => format!("[number <= {}]", b),
                (None, None) => "[number]".to_string(),
            },
            Widget::Dropdown { options } => format!("[select: {}]", options.join(" | ")),
            Widget::RadioGroup { options } => {
                let items: Vec<String> = options.iter().map(|o| format!("( ) {}", o)).collect();
                items.join("  ")
            }
            Widget::CheckboxGroup { options } if options.is_empty() => "[ ]".to_string(),
            Widget::CheckboxGroup { options } => {
                let items: Vec<String> = options.iter().map(|o| format!("[ ] {}", o)).collect();
                items.join("  ")
            }
            Widget::DatePicker => "[YYYY-MM-DD]".to_string(),
            Widget::FileUpload => "[file upload]".to_string(),
            Widget::Stars { scale } => "☆".repeat(*scale as usize),
            Widget::LikertScale { options } => format!("<{}>", options.join(" | ")),
            Widget::Heading => String::new(),
            Widget::StaticHtml { content } => content.clone(),
        }
    }
}

/// Plain-text preview of a form.
pub fn render_form(form: &Form) -> String {
    let def = &form.definition;
    let mut out = String::new();

    let _ = writeln!(out, "{} {}(form #{}){}", bold(&def.title), GREY, form.id, RESET);
    if !def.description.is_empty() {
        let _ = writeln!(out, "{}", def.description);
    }
    let _ = writeln!(out);

    for field in &def.fields {
        let widget = widget_for(field);
        match field.field_type {
            FieldType::Section => {
                let _ = writeln!(out, "\n== {} ==", field.label);
            }
            FieldType::Html => {
                let _ = writeln!(out, "{}{}{}", GREY, widget.describe(), RESET);
            }
            _ => {
                let marker = if field.required { " *" } else { "" };
                let _ = writeln!(
                    out,
                    "{}{}  {}{}{}  {}",
                    field.label,
                    marker,
                    GREY,
                    field.id,
                    RESET,
                    widget.describe()
                );
            }
        }
    }

    out
}
