//! Ports (interfaces) for external collaborators
//!
//! Ports are defined here in the application layer and implemented by
//! adapters in the infrastructure layer.

pub mod embedding;
pub mod generation;
pub mod progress;

pub use embedding::{EmbeddingError, EmbeddingGateway};
pub use generation::{GenerationError, GenerationGateway, GenerationRequest};
pub use progress::{NoProgress, SessionObserver};
