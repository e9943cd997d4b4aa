//! Run Session use case
//!
//! Drives the scheduler loop: picks the acting persona, resolves what it
//! may observe, issues the generation call, and appends the turn record.
//! Strictly sequential by design — each turn must observe the result of
//! all prior turns, so there is no parallel fan-out between personas.

use crate::compactor::ContextCompactor;
use crate::params::SessionParams;
use crate::ports::generation::{GenerationGateway, GenerationRequest};
use crate::ports::progress::{NoProgress, SessionObserver};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tandem_domain::{
    Message, Persona, Phase, PhaseSchedule, PromptTemplate, Strategy, Topic, Transcript, TurnRecord,
};
use tracing::{info, warn};

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    /// The planning task or brainstorming topic
    pub topic: Topic,
    /// The two acting personas, in speaking order
    pub personas: (Persona, Persona),
    /// Turn allocation across phases
    pub strategy: Strategy,
}

impl RunSessionInput {
    pub fn new(topic: Topic, personas: (Persona, Persona), strategy: Strategy) -> Self {
        Self {
            topic,
            personas,
            strategy,
        }
    }
}

/// Final state of a completed session
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub topic: Topic,
    pub personas: Vec<String>,
    pub strategy: String,
    pub transcript: Transcript,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionOutcome {
    /// Turn counts grouped by phase
    pub fn counts_by_phase(&self) -> Vec<(Phase, usize)> {
        [Phase::Divergent, Phase::Convergent]
            .into_iter()
            .map(|phase| (phase, self.transcript.count_by_phase(phase)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Turn counts grouped by persona
    pub fn counts_by_participant(&self) -> Vec<(String, usize)> {
        self.personas
            .iter()
            .map(|name| (name.clone(), self.transcript.count_by_speaker(name)))
            .collect()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Use case for running a two-persona session
pub struct RunSessionUseCase<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    params: SessionParams,
}

impl<G: GenerationGateway + 'static> RunSessionUseCase<G> {
    pub fn new(gateway: Arc<G>, params: SessionParams) -> Self {
        Self { gateway, params }
    }

    /// Execute the session with default (no-op) progress
    pub async fn execute(&self, input: RunSessionInput) -> SessionOutcome {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the session with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunSessionInput,
        progress: &dyn SessionObserver,
    ) -> SessionOutcome {
        let mut schedule = PhaseSchedule::new(input.strategy);
        let mut compactor = ContextCompactor::new(
            Arc::clone(&self.gateway),
            self.params.model.clone(),
            self.params.chunk_threshold,
        );
        let mut transcript = Transcript::new();
        let personas = [&input.personas.0, &input.personas.1];

        let started_at = Utc::now();
        info!(
            topic = %input.topic,
            strategy = input.strategy.name(),
            total_turns = schedule.total_turns(),
            "starting session"
        );
        progress.on_session_start(&input.topic, schedule.total_turns());

        let mut last_phase = schedule.current_phase();

        while schedule.should_continue() {
            let phase = schedule.current_phase();
            if phase != last_phase {
                info!(%phase, "phase transition");
                progress.on_phase_transition(phase);
                last_phase = phase;
            }

            let speaker = personas[schedule.speaker_index(personas.len())];
            let turn = schedule.current_turn() + 1;
            progress.on_turn_start(turn, speaker.name(), phase);

            let visible = schedule.visible_slice(&transcript, speaker.name());

            let user_prompt = match phase {
                Phase::Divergent => PromptTemplate::divergent_prompt(
                    &input.topic,
                    &visible,
                    schedule.current_turn(),
                    schedule.total_turns(),
                ),
                Phase::Convergent => {
                    let history_block = compactor.compact(&input.topic, &visible).await;
                    PromptTemplate::convergent_prompt(
                        &input.topic,
                        &history_block,
                        schedule.current_turn(),
                        schedule.total_turns(),
                    )
                }
            };

            let request = GenerationRequest::new(
                self.params.model.clone(),
                vec![
                    Message::system(speaker.descriptor()),
                    Message::user(user_prompt),
                ],
            )
            .with_temperature(self.params.temperature)
            .with_max_tokens(self.params.max_tokens);

            // A failed call becomes a visible placeholder turn so one
            // backend hiccup does not abort the whole session
            let content = match self.gateway.generate(request).await {
                Ok(text) if text.trim().is_empty() => "[No response generated]".to_string(),
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!(turn, speaker = speaker.name(), error = %e, "generation failed");
                    format!("[generation failed: {}]", e)
                }
            };

            let record = TurnRecord::new(turn, speaker.name(), phase, content);
            progress.on_turn_complete(&record);
            transcript.append(record);
            schedule.advance();
        }

        let finished_at = Utc::now();
        info!(turns = transcript.len(), "session complete");
        progress.on_session_complete(&transcript);

        SessionOutcome {
            topic: input.topic,
            personas: vec![
                input.personas.0.name().to_string(),
                input.personas.1.name().to_string(),
            ],
            strategy: input.strategy.name().to_string(),
            transcript,
            started_at,
            finished_at,
        }
    }
}
