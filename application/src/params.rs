//! Session parameters with fail-fast validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration invariant violations, fatal at construction
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("chunk_threshold must be at least 1")]
    InvalidChunkThreshold,

    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be at least 1")]
    InvalidMaxTokens,

    #[error("model identifier cannot be empty")]
    EmptyModel,
}

/// Knobs governing generation calls and context compaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Target model identifier for turn and summary generation
    pub model: String,
    /// Turns represented verbatim before folding into the cumulative summary
    pub chunk_threshold: usize,
    /// Sampling temperature for turn generation
    pub temperature: f32,
    /// Maximum output length for turn generation
    pub max_tokens: u32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            model: "gemma3:4b".to_string(),
            chunk_threshold: 5,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl SessionParams {
    /// Create validated parameters
    pub fn new(
        model: impl Into<String>,
        chunk_threshold: usize,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, ConfigError> {
        let params = Self {
            model: model.into(),
            chunk_threshold,
            temperature,
            max_tokens,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check all range invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.chunk_threshold == 0 {
            return Err(ConfigError::InvalidChunkThreshold);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }
        Ok(())
    }
}
