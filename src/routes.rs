use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::{
    gemini::ContentBackend,
    models::{audience_suggestions, GenerateRequest, GeneratedContent, GenerationInput, InputError, Outcome, Platform, Tone, VisualType},
    pipeline::Orchestrator,
};

/// Base64 of a 10 MB image plus room for the rest of the JSON body.
const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

const FALLBACK_WARNING: &str = "AI generation failed. Using fallback content. Please check your API key configuration.";

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ContentBackend>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("{}", .0.body_text())]
    BadBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
            ApiError::BadBody(rejection) => (rejection.status(), "INVALID_BODY"),
        };
        let body = Json(json!({ "error": { "code": code, "message": self.to_string() } }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub platform: Platform,
    pub character_limit: usize,
    pub within_limit: bool,
    pub post_text: String,
    pub content: GeneratedContent,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(catalog))
        .route("/api/generate", post(generate_post))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION"), "service": env!("CARGO_PKG_NAME") }))
}

pub async fn catalog() -> Json<Value> {
    let platforms: Vec<_> = Platform::ALL
        .iter()
        .map(|p| json!({ "name": p.name(), "character_limit": p.character_limit() }))
        .collect();
    let tones: Vec<_> = Tone::ALL
        .iter()
        .map(|t| json!({ "name": t.name(), "emoji": t.emoji(), "description": t.description() }))
        .collect();
    let visual_types: Vec<_> = VisualType::ALL
        .iter()
        .map(|v| json!({ "name": v.name(), "description": v.description() }))
        .collect();
    Json(json!({
        "platforms": platforms,
        "tones": tones,
        "visual_types": visual_types,
        "audiences": audience_suggestions(),
    }))
}

pub async fn generate_post(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let Json(body) = body?;
    let input = GenerationInput::try_from(body)?;
    tracing::info!(%request_id, "🎯 Post requested for brand: {}", input.brand);

    let mut orchestrator = Orchestrator::new(state.backend.clone());
    let generation = orchestrator.generate(&input).await.map_err(|e| {
        tracing::info!(%request_id, "⚠️ Rejected request: {}", e);
        e
    })?;

    tracing::debug!(%request_id, state = ?orchestrator.state(), has_result = orchestrator.last().is_some(), "Orchestrator settled");

    let platform = input.platform;
    let content = generation.content;
    tracing::info!(%request_id, outcome = ?generation.outcome, "✅ Post ready ({} / {} chars)", content.character_count, platform.character_limit());

    Ok(Json(GenerateResponse {
        request_id,
        generated_at: Utc::now(),
        outcome: generation.outcome,
        warning: (generation.outcome == Outcome::FellBack).then(|| FALLBACK_WARNING.to_string()),
        platform,
        character_limit: platform.character_limit(),
        within_limit: content.fits(platform),
        post_text: content.to_post_text(),
        content,
    }))
}
