use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use crate::models::GeneratedContent;

const NO_VISUAL: &str = "No visual description generated";
const NO_CAPTION: &str = "No caption generated";
const NO_CALL_TO_ACTION: &str = "Engage with this post!";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model output is not valid JSON: {source}: {text}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        text: String,
    },
    #[error("model output is not a JSON object: {text}")]
    NotAnObject { text: String },
}

/// Turns raw model text into content. Only fails when the text is not a JSON
/// object; every field is coerced to a usable value.
pub fn parse_content(raw: &str) -> Result<GeneratedContent, ParseError> {
    let text = strip_code_fences(raw);
    let value: Value = serde_json::from_str(text).map_err(|source| {
        error!("❌ Error parsing model response: {}", source);
        ParseError::InvalidJson { source, text: text.to_string() }
    })?;
    let Value::Object(fields) = value else {
        return Err(ParseError::NotAnObject { text: text.to_string() });
    };

    Ok(GeneratedContent::new(
        text_field(&fields, "visualDescription", NO_VISUAL),
        text_field(&fields, "caption", NO_CAPTION),
        hashtags(&fields),
        text_field(&fields, "callToAction", NO_CALL_TO_ACTION),
    ))
}

/// Removes a ```lang ... ``` wrapper if the model added one.
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

fn text_field(fields: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => placeholder.to_string(),
    }
}

fn hashtags(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("hashtags") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
