//! Console output for running sessions

use colored::Colorize;
use tandem_application::SessionObserver;
use tandem_domain::{Phase, Topic, Transcript, TurnRecord};

const RULE: &str =
    "======================================================================";

/// Observer that narrates the session to stdout
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_session_start(&self, topic: &Topic, total_turns: u32) {
        println!("\n{}", RULE);
        println!("{}", "TWO-AGENT PLANNING SESSION".bold());
        println!("{}", RULE);
        println!("\nTopic: {}", topic);
        println!("Total turns: {}", total_turns);
        println!("\n{}", RULE);
    }

    fn on_phase_transition(&self, phase: Phase) {
        println!("\n{}", RULE);
        println!(
            "{} {}",
            "PHASE TRANSITION →".bold(),
            phase.display_name().to_uppercase().cyan().bold()
        );
        println!("{}", RULE);
    }

    fn on_turn_start(&self, turn: u32, speaker: &str, phase: Phase) {
        println!(
            "\n[Turn {}] {} ({} phase)",
            turn,
            speaker.green().bold(),
            phase
        );
        println!("{}", "-".repeat(60));
    }

    fn on_turn_complete(&self, record: &TurnRecord) {
        println!("{}", record.content);
    }

    fn on_session_complete(&self, transcript: &Transcript) {
        println!("\n{}", RULE);
        println!("{}", "SESSION COMPLETE".bold());
        println!("{}", RULE);
        println!("Total turns: {}", transcript.len());
        println!("\nTurns by phase:");
        for phase in [Phase::Divergent, Phase::Convergent] {
            let count = transcript.count_by_phase(phase);
            if count > 0 {
                println!("  {}: {}", phase, count);
            }
        }
        println!("{}\n", RULE);
    }
}

/// One-off banners printed outside the session loop
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Announce the selected persona pair and its similarity score
    pub fn pair_selection(left: &str, right: &str, score: f32, dissimilar: bool) -> String {
        let rationale = if dissimilar {
            "maximum semantic divergence promotes cross-domain synthesis"
        } else {
            "maximum semantic overlap promotes depth within one domain"
        };
        format!(
            "Selected pair: {} × {} (cosine similarity {:.3})\n  Rationale: {}",
            left.green().bold(),
            right.green().bold(),
            score,
            rationale
        )
    }
}
