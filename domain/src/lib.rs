//! Domain layer for tandem
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Divergent / Convergent
//!
//! A tandem session runs two personas through a two-phase exchange:
//!
//! - **Divergent**: each persona sees only its own prior turns and ideates
//!   in epistemic isolation
//! - **Convergent**: both personas see the shared transcript and synthesize
//!
//! The [`schedule::PhaseSchedule`] decides, per turn, who speaks and which
//! slice of the [`transcript::Transcript`] the speaker may observe.

pub mod message;
pub mod persona;
pub mod prompt;
pub mod schedule;
pub mod topic;
pub mod transcript;

// Re-export commonly used types
pub use message::{Message, Role};
pub use persona::Persona;
pub use prompt::PromptTemplate;
pub use schedule::{PhaseSchedule, Strategy};
pub use topic::{Topic, TopicError};
pub use transcript::{Phase, Transcript, TurnRecord};
