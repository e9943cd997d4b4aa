//! Session export: JSON and Markdown documents
//!
//! Writes a completed [`SessionOutcome`] to disk as either a structured
//! JSON document (records plus aggregate counts) or a readable Markdown
//! report grouped by phase.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tandem_application::SessionOutcome;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes session outcomes to disk
pub struct SessionExporter;

impl SessionExporter {
    /// Write the outcome as pretty-printed JSON
    ///
    /// Creates parent directories if needed.
    pub fn write_json(outcome: &SessionOutcome, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let document = Self::json_document(outcome);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;

        info!(path = %path.display(), "session exported as JSON");
        Ok(())
    }

    /// Write the outcome as a Markdown report
    pub fn write_markdown(
        outcome: &SessionOutcome,
        path: impl AsRef<Path>,
    ) -> Result<(), ExportError> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(Self::markdown_document(outcome).as_bytes())?;
        writer.flush()?;

        info!(path = %path.display(), "session exported as Markdown");
        Ok(())
    }

    /// The JSON document shape: metadata, ordered records, aggregate counts
    pub fn json_document(outcome: &SessionOutcome) -> serde_json::Value {
        let by_phase: serde_json::Map<String, serde_json::Value> = outcome
            .counts_by_phase()
            .into_iter()
            .map(|(phase, count)| (phase.display_name().to_string(), count.into()))
            .collect();

        let by_agent: serde_json::Map<String, serde_json::Value> = outcome
            .counts_by_participant()
            .into_iter()
            .map(|(name, count)| (name, count.into()))
            .collect();

        serde_json::json!({
            "topic": outcome.topic.content(),
            "agents": outcome.personas,
            "strategy": outcome.strategy,
            "session_start": outcome.started_at.to_rfc3339(),
            "session_end": outcome.finished_at.to_rfc3339(),
            "results": outcome.transcript.records(),
            "summary": {
                "total_turns": outcome.transcript.len(),
                "by_phase": by_phase,
                "by_agent": by_agent,
            },
        })
    }

    /// The Markdown report: configuration header, then results by phase
    pub fn markdown_document(outcome: &SessionOutcome) -> String {
        let mut lines = vec![
            "# Two-Agent Planning Session".to_string(),
            format!("\n## Topic\n\n{}", outcome.topic),
            "\n## Configuration\n".to_string(),
            format!("- **Strategy**: {}", outcome.strategy),
            format!("- **Agents**: {}", outcome.personas.join(", ")),
            format!("- **Session Start**: {}", outcome.started_at.to_rfc3339()),
            format!("- **Session End**: {}", outcome.finished_at.to_rfc3339()),
            "\n## Results\n".to_string(),
        ];

        for (phase, count) in outcome.counts_by_phase() {
            lines.push(format!("\n### {} Phase ({} turns)\n", phase, count));
            for record in outcome
                .transcript
                .iter()
                .filter(|r| r.phase == phase)
            {
                lines.push(format!(
                    "**Turn {} - {}**\n\n{}\n",
                    record.turn, record.speaker, record.content
                ));
            }
        }

        lines.join("\n")
    }

    /// Write a generated report document
    pub fn write_report(markdown: &str, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        std::fs::write(path, markdown)?;

        info!(path = %path.display(), "report written");
        Ok(())
    }

    fn ensure_parent(path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
