//! Transcript entities: phases, turn records, and the append-only log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of a tandem session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Each persona observes only its own prior output
    Divergent,
    /// Both personas observe the shared, compacted transcript
    Convergent,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Divergent => "divergent",
            Phase::Convergent => "convergent",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Divergent => "Divergent",
            Phase::Convergent => "Convergent",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single contribution to the session (Entity)
///
/// Created exactly once by the orchestrator, never mutated or deleted.
/// `turn` values are strictly increasing starting at 1 and define the
/// transcript's total order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub speaker: String,
    pub phase: Phase,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    pub fn new(turn: u32, speaker: impl Into<String>, phase: Phase, content: impl Into<String>) -> Self {
        Self {
            turn,
            speaker: speaker.into(),
            phase,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only sequence of turn records
///
/// Shared read-only by personas, scheduler, and compactor; exclusively
/// appended-to by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    records: Vec<TurnRecord>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    ///
    /// # Panics
    /// Panics if the record's turn number does not continue the sequence.
    /// A gap means the caller desynchronized turn bookkeeping, which is a
    /// programmer error, not a recoverable condition.
    pub fn append(&mut self, record: TurnRecord) {
        assert_eq!(
            record.turn as usize,
            self.records.len() + 1,
            "TurnRecord.turn must continue the transcript sequence"
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnRecord> {
        self.records.iter()
    }

    /// Number of records tagged with the given phase
    pub fn count_by_phase(&self, phase: Phase) -> usize {
        self.records.iter().filter(|r| r.phase == phase).count()
    }

    /// Number of records spoken by the given persona
    pub fn count_by_speaker(&self, speaker: &str) -> usize {
        self.records.iter().filter(|r| r.speaker == speaker).count()
    }
}
