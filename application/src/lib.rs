//! Application layer for tandem
//!
//! Use cases and ports. The session loop, context compaction, and pair
//! selection live here; concrete backends are injected through the port
//! traits and implemented in the infrastructure layer.

pub mod compactor;
pub mod params;
pub mod ports;
pub mod report;
pub mod selector;
pub mod use_cases;

// Re-export commonly used types
pub use compactor::ContextCompactor;
pub use params::{ConfigError, SessionParams};
pub use report::ReportGenerator;
pub use ports::{
    EmbeddingError, EmbeddingGateway, GenerationError, GenerationGateway, GenerationRequest,
    NoProgress, SessionObserver,
};
pub use selector::{PairSimilarity, PersonaSelector, SelectorError};
pub use use_cases::{RunSessionInput, RunSessionUseCase, SessionOutcome};
