//! Configuration file schema

use serde::{Deserialize, Serialize};

/// Root configuration loaded from files and environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

/// `[backend]` section: where generation and embedding calls go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API root of an OpenAI-compatible endpoint
    pub base_url: String,
    /// Bearer token; local backends accept any placeholder
    pub api_key: String,
    /// Model for turn and summary generation
    pub model: String,
    /// Model for descriptor embeddings
    pub embedding_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: "ollama".to_string(),
            model: "gemma3:4b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
        }
    }
}

/// `[session]` section: turn allocation and generation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub divergent_turns: u32,
    pub convergent_turns: u32,
    pub chunk_threshold: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            divergent_turns: 5,
            convergent_turns: 10,
            chunk_threshold: 5,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}
