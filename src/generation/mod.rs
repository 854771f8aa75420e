//! Story generation through a generative-text provider.
//!
//! The app only needs `prompt -> text`, so providers implement the small
//! [`TextGenerator`] trait. [`gemini::GeminiClient`] is the production
//! implementation; tests plug in canned generators.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("GEMINI_API_KEY is not a valid header value")]
    InvalidApiKey,

    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),

    #[error("synopsis is empty")]
    EmptySynopsis,

    #[error("request failed: {0}")]
    Http(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("no text produced")]
    NoText,
}

pub type GenerateFuture = Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send>>;

pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: String) -> GenerateFuture;
}

/// What the user asked for: a story from `synopsis` of roughly `number_of_words` words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRequest {
    pub synopsis: String,
    pub number_of_words: u32,
    pub language: String,
}

impl StoryRequest {
    pub fn new(synopsis: impl Into<String>, number_of_words: u32, language: impl Into<String>) -> Self {
        Self {
            synopsis: synopsis.into(),
            number_of_words,
            language: language.into(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Write a story based on the synopsis ```{}``` with {} words in the language {}.",
            self.synopsis, self.number_of_words, self.language
        )
    }
}

/// Runs one story request. Blank output counts as a failure so the caller
/// never starts reading an empty story.
pub async fn generate_story(
    generator: &dyn TextGenerator,
    request: &StoryRequest,
) -> Result<String, GenerationError> {
    if request.synopsis.trim().is_empty() {
        return Err(GenerationError::EmptySynopsis);
    }

    tracing::info!(
        words = request.number_of_words,
        language = %request.language,
        "requesting story"
    );
    let text = generator.generate(request.prompt()).await.map_err(|e| {
        tracing::warn!(error = %e, "story generation failed");
        e
    })?;

    let text = text.trim();
    if text.is_empty() {
        tracing::warn!("provider returned blank text");
        return Err(GenerationError::NoText);
    }
    tracing::debug!(chars = text.len(), "story generated");
    Ok(text.to_string())
}
