//! Persona entity

use serde::{Deserialize, Serialize};

/// A participant persona: a unique name plus a fixed behavioral descriptor
///
/// The descriptor doubles as the system prompt for generation calls and as
/// the text that gets embedded for pair selection. Immutable once created;
/// schedulers and orchestrators reference personas, they never copy them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    name: String,
    descriptor: String,
}

impl Persona {
    /// Create a new persona
    ///
    /// # Panics
    /// Panics if the name is empty
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.trim().is_empty(), "Persona name cannot be empty");
        Self {
            name,
            descriptor: descriptor.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The behavioral descriptor, used verbatim as the system prompt
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
