use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::fallback::fallback;
use crate::gemini::{ContentBackend, GeminiError};
use crate::models::{GeneratedContent, Generation, GenerationInput, InputError, Outcome};
use crate::parser::{parse_content, ParseError};
use crate::prompt::build_prompt;

/// Why a generation attempt fell back. Never surfaced to the end user.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation failed: {0}")]
    Transport(#[from] GeminiError),
    #[error("generation failed: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
}

/// Runs one request at a time: prompt, backend call, parse, and the
/// fallback when any of those fail.
pub struct Orchestrator<B: ?Sized> {
    backend: Arc<B>,
    state: GenerationState,
    last: Option<Generation>,
}

impl<B: ContentBackend + ?Sized> Orchestrator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend, state: GenerationState::Idle, last: None }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Result of the most recent completed request.
    pub fn last(&self) -> Option<&Generation> {
        self.last.as_ref()
    }

    /// Rejects invalid input before doing anything. Once input is valid this
    /// always yields content, falling back when the model path fails.
    pub async fn generate(&mut self, input: &GenerationInput) -> Result<Generation, InputError> {
        input.validate()?;

        self.last = None;
        self.state = GenerationState::Generating;
        let mode = input.mode();
        info!("🚀 Generating {:?} content for {} on {}", mode, input.brand, input.platform.name());

        let generation = match self.attempt(input).await {
            Ok(content) => {
                info!("✅ Generated content ({} chars)", content.character_count);
                Generation { content, outcome: Outcome::Succeeded }
            }
            Err(e) => {
                warn!("🔄 Falling back to template content: {}", e);
                Generation { content: fallback(input, mode), outcome: Outcome::FellBack }
            }
        };

        self.last = Some(generation.clone());
        self.state = GenerationState::Idle;
        Ok(generation)
    }

    async fn attempt(&self, input: &GenerationInput) -> Result<GeneratedContent, GenerationError> {
        let payload = build_prompt(input);
        let raw = self.backend.invoke(&payload).await?;
        Ok(parse_content(&raw)?)
    }
}
