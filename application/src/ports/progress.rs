//! Session progress port
//!
//! Callback interface for observing a running session. The console
//! presenter implements this; use cases accept any implementation.

use tandem_domain::{Phase, Topic, Transcript, TurnRecord};

/// Callbacks fired as a session progresses
pub trait SessionObserver: Send + Sync {
    /// Called once before the first turn
    fn on_session_start(&self, topic: &Topic, total_turns: u32);

    /// Called when the schedule crosses a phase boundary
    fn on_phase_transition(&self, phase: Phase);

    /// Called before the acting persona's generation call
    fn on_turn_start(&self, turn: u32, speaker: &str, phase: Phase);

    /// Called after a record has been produced for the turn
    fn on_turn_complete(&self, record: &TurnRecord);

    /// Called once after the last turn
    fn on_session_complete(&self, transcript: &Transcript);
}

/// No-op observer
pub struct NoProgress;

impl SessionObserver for NoProgress {
    fn on_session_start(&self, _topic: &Topic, _total_turns: u32) {}
    fn on_phase_transition(&self, _phase: Phase) {}
    fn on_turn_start(&self, _turn: u32, _speaker: &str, _phase: Phase) {}
    fn on_turn_complete(&self, _record: &TurnRecord) {}
    fn on_session_complete(&self, _transcript: &Transcript) {}
}
