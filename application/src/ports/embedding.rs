//! Embedding gateway port

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during an embedding call
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Embedding failed: {0}")]
    Other(String),
}

/// Gateway for text embeddings
///
/// Implementations must be deterministic for identical input and return
/// one fixed-length vector per input string, in input order.
#[async_trait]
pub trait EmbeddingGateway: Send + Sync {
    /// Embed a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
