//! Topic value object

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for topic construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
    #[error("topic is empty or only whitespace")]
    Empty,
}

/// The planning task or brainstorming topic for a session (Value Object)
///
/// Both personas receive the same topic; it anchors every turn prompt and
/// every summary request. Construction validates, so a held `Topic` is
/// always non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a topic, rejecting blank input
    pub fn new(content: impl Into<String>) -> Result<Self, TopicError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self { content })
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
