//! Infrastructure layer for tandem
//!
//! Adapters for external collaborators: OpenAI-compatible HTTP backends,
//! configuration file loading, and on-disk export.

pub mod config;
pub mod export;
pub mod providers;

// Re-export commonly used types
pub use config::{BackendConfig, ConfigLoader, FileConfig, SessionConfig};
pub use export::{ExportError, SessionExporter};
pub use providers::{OpenAiChatGateway, OpenAiEmbeddingGateway};
