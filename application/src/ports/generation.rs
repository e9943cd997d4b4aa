//! Generation gateway port
//!
//! Defines the single capability the core needs from a text-generation
//! backend: turn role-tagged messages into text. Any concrete backend
//! (hosted API, local model server) satisfies it.

use async_trait::async_trait;
use tandem_domain::Message;
use thiserror::Error;

/// Errors that can occur during a generation call
///
/// The core never retries automatically; callers convert these into
/// visible placeholder content or deterministic fallbacks so one failed
/// call does not abort a session.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Quota exceeded: {0}")]
    Quota(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation failed: {0}")]
    Other(String),
}

/// A single generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Target model identifier
    pub model: String,
    /// Role-tagged conversation segments
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output length in tokens
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Gateway for text generation
///
/// Timeout and retry policy belong to the implementation; the core issues
/// one call per turn or summary and awaits it.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate text from the given messages
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
