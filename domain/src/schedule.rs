//! Phase scheduling state machine
//!
//! A [`Strategy`] is a closed set of tagged variants sharing one interface:
//! phase lookup, termination, and transcript filtering are all pure
//! functions of the turn index, so the same scheduler instance can cross
//! the divergent/convergent boundary mid-session without cached state
//! going stale.

use crate::transcript::{Phase, Transcript, TurnRecord};
use serde::{Deserialize, Serialize};

/// How a session allocates its turns across phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// All turns isolated; never enters Convergent
    DivergentOnly { divergent_turns: u32 },
    /// All turns shared; starts directly in Convergent
    ConvergentOnly { convergent_turns: u32 },
    /// Isolated ideation followed by shared synthesis (default)
    DivergentThenConvergent {
        divergent_turns: u32,
        convergent_turns: u32,
    },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DivergentOnly { .. } => "divergent-only",
            Strategy::ConvergentOnly { .. } => "convergent-only",
            Strategy::DivergentThenConvergent { .. } => "divergent-then-convergent",
        }
    }

    pub fn divergent_turns(&self) -> u32 {
        match self {
            Strategy::DivergentOnly { divergent_turns } => *divergent_turns,
            Strategy::ConvergentOnly { .. } => 0,
            Strategy::DivergentThenConvergent {
                divergent_turns, ..
            } => *divergent_turns,
        }
    }

    pub fn convergent_turns(&self) -> u32 {
        match self {
            Strategy::DivergentOnly { .. } => 0,
            Strategy::ConvergentOnly { convergent_turns } => *convergent_turns,
            Strategy::DivergentThenConvergent {
                convergent_turns, ..
            } => *convergent_turns,
        }
    }

    pub fn total_turns(&self) -> u32 {
        self.divergent_turns() + self.convergent_turns()
    }

    /// Phase in effect at a given 0-based turn index
    pub fn phase_at(&self, turn: u32) -> Phase {
        if turn < self.divergent_turns() {
            Phase::Divergent
        } else {
            Phase::Convergent
        }
    }
}

/// Tracks the current turn and answers who speaks, what they see, and
/// whether the session continues
///
/// The phase boundary is recomputed from `current_turn` on every call,
/// never cached, so a single instance transitions cleanly mid-session.
#[derive(Debug, Clone)]
pub struct PhaseSchedule {
    strategy: Strategy,
    current_turn: u32,
}

impl PhaseSchedule {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            current_turn: 0,
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// 0-based index of the turn about to be taken
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn total_turns(&self) -> u32 {
        self.strategy.total_turns()
    }

    /// Phase in effect for the upcoming turn
    pub fn current_phase(&self) -> Phase {
        self.strategy.phase_at(self.current_turn)
    }

    /// True while more turns remain
    pub fn should_continue(&self) -> bool {
        self.current_turn < self.strategy.total_turns()
    }

    /// Advance past a completed turn
    ///
    /// Caller contract: call exactly once per appended record. Calling it
    /// more or fewer times desynchronizes phase computation from the
    /// transcript length.
    pub fn advance(&mut self) {
        self.current_turn += 1;
    }

    /// Strict round-robin speaker selection
    pub fn speaker_index(&self, participant_count: usize) -> usize {
        self.current_turn as usize % participant_count
    }

    /// The transcript slice the acting persona may observe this turn
    ///
    /// Divergent: only the speaker's own records (epistemic isolation by
    /// construction of the filter). Convergent: the full transcript.
    pub fn visible_slice(&self, transcript: &Transcript, speaker: &str) -> Vec<TurnRecord> {
        match self.current_phase() {
            Phase::Divergent => transcript
                .iter()
                .filter(|r| r.speaker == speaker)
                .cloned()
                .collect(),
            Phase::Convergent => transcript.records().to_vec(),
        }
    }
}
