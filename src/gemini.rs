use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::prompt::PromptPayload;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication rejected (status {status}): {body}")]
    Auth { status: u16, body: String },
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("prompt blocked by backend: {0}")]
    Blocked(String),
    #[error("unreadable response envelope: {0}")]
    Envelope(String),
    #[error("response contained no text")]
    EmptyResponse,
}

/// The generative backend as seen by the pipeline: one prompt in, raw text out.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn invoke(&self, payload: &PromptPayload) -> Result<String, GeminiError>;
}

// Shortens inline base64 blobs so request bodies stay readable in logs.
fn truncate_base64_in_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self { client: Client::new(), api_key, base_url, model }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gemini_api_key.clone(), config.gemini_api_base.clone(), config.gemini_model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(payload: &PromptPayload) -> Value {
        let mut parts = vec![json!({ "text": payload.instruction })];
        if let Some(image) = &payload.image {
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                }
            }));
        }
        json!({ "contents": [{ "parts": parts }] })
    }
}

#[async_trait]
impl ContentBackend for GeminiClient {
    async fn invoke(&self, payload: &PromptPayload) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or(GeminiError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, api_key);
        info!("🔗 Making request to: {}", url.replace(api_key, "***"));

        let request_body = Self::request_body(payload);
        let mut logged_body = request_body.clone();
        truncate_base64_in_json(&mut logged_body);
        info!("📤 Request body: {}", serde_json::to_string_pretty(&logged_body).unwrap_or_default());

        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        info!("📥 Response status: {}", status);
        let response_text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!("❌ Gemini rejected the API key: {}", response_text);
            return Err(GeminiError::Auth { status: status.as_u16(), body: response_text });
        }
        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(GeminiError::Api { status: status.as_u16(), body: response_text });
        }

        let GeminiResponse { candidates, prompt_feedback } = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Envelope(format!("{}: {}", e, response_text)))?;

        if let Some(reason) = prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }

        let text = extract_text(&candidates).ok_or(GeminiError::EmptyResponse)?;
        info!("✅ Gemini returned {} chars of text", text.len());
        Ok(text)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(Value),
}

/// Concatenates the text parts of the first candidate that has any.
fn extract_text(candidates: &[Candidate]) -> Option<String> {
    candidates.iter().find_map(|c| {
        let text: String = c
            .content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::Other(_) => None,
            })
            .collect();
        (!text.trim().is_empty()).then(|| text.trim().to_string())
    })
}
