//! Comprehensive report generation from a finished session
//!
//! Two-stage synthesis over the compacted transcript: one call decides the
//! document title and section outline, then one call per section writes its
//! content. Backend failures degrade to a default outline or a visible
//! placeholder section, never an error.

use crate::compactor::ContextCompactor;
use crate::ports::{GenerationGateway, GenerationRequest};
use serde::Deserialize;
use std::sync::Arc;
use tandem_domain::{Message, PromptTemplate, Topic, Transcript};
use tracing::{info, warn};

/// Sampling temperature for the outline call
const OUTLINE_TEMPERATURE: f32 = 0.3;
/// Output budget for the outline call
const OUTLINE_MAX_TOKENS: u32 = 500;
/// Sampling temperature for section synthesis
const SECTION_TEMPERATURE: f32 = 0.4;
/// Output budget per section
const SECTION_MAX_TOKENS: u32 = 1500;

/// Outline used when the structure call fails or returns nothing usable
const DEFAULT_SECTIONS: [&str; 4] = [
    "Executive Summary",
    "Key Discussion Points",
    "Proposed Solutions",
    "Next Steps",
];

/// The outline shape the backend is asked to return
#[derive(Debug, Deserialize)]
struct ReportOutline {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    sections: Vec<String>,
}

/// Synthesizes a Markdown design document from a session transcript
pub struct ReportGenerator<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    model: String,
    chunk_threshold: usize,
}

impl<G: GenerationGateway + 'static> ReportGenerator<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>, chunk_threshold: usize) -> Self {
        Self {
            gateway,
            model: model.into(),
            chunk_threshold,
        }
    }

    /// Generate the full report
    ///
    /// The transcript is compacted the same way convergent turns see it, so
    /// long sessions fit the outline and section prompts.
    pub async fn generate(&self, topic: &Topic, transcript: &Transcript) -> String {
        let mut compactor = ContextCompactor::new(
            Arc::clone(&self.gateway),
            self.model.clone(),
            self.chunk_threshold,
        );
        let context = compactor.compact(topic, transcript.records()).await;

        let (doc_title, outline) = self.outline(topic, &context).await;
        info!(
            title = %doc_title,
            sections = outline.len(),
            "report outline resolved"
        );

        let mut report = format!("# {}\n\n**Topic:** {}\n\n", doc_title, topic);
        for section_title in &outline {
            let content = self
                .section(section_title, &doc_title, topic, &context)
                .await;
            report.push_str(&format!("## {}\n\n{}\n\n", section_title, content));
        }
        report
    }

    /// Resolve the document title and section list, falling back to a
    /// default outline on any failure
    async fn outline(&self, topic: &Topic, context: &str) -> (String, Vec<String>) {
        let default_title = format!("Comprehensive Report: {}", topic);
        let default_outline = || {
            DEFAULT_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        };

        let request = GenerationRequest::new(
            self.model.clone(),
            vec![
                Message::system(PromptTemplate::report_outline_system()),
                Message::user(PromptTemplate::report_outline_prompt(context)),
            ],
        )
        .with_temperature(OUTLINE_TEMPERATURE)
        .with_max_tokens(OUTLINE_MAX_TOKENS);

        let response = match self.gateway.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "report outline call failed, using default outline");
                return (default_title, default_outline());
            }
        };

        match parse_outline(&response) {
            Some(outline) if !outline.sections.is_empty() => {
                let title = outline.title.unwrap_or(default_title);
                (title, outline.sections)
            }
            _ => {
                warn!("report outline response unusable, using default outline");
                (default_title, default_outline())
            }
        }
    }

    /// Write one section, degrading to a placeholder on failure
    async fn section(
        &self,
        section_title: &str,
        doc_title: &str,
        topic: &Topic,
        context: &str,
    ) -> String {
        let request = GenerationRequest::new(
            self.model.clone(),
            vec![
                Message::system(PromptTemplate::report_section_system()),
                Message::user(PromptTemplate::report_section_prompt(
                    section_title,
                    doc_title,
                    topic,
                    context,
                )),
            ],
        )
        .with_temperature(SECTION_TEMPERATURE)
        .with_max_tokens(SECTION_MAX_TOKENS);

        match self.gateway.generate(request).await {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                warn!(section = section_title, error = %e, "section generation failed");
                "[Content generation failed]".to_string()
            }
        }
    }
}

/// Extract the outline JSON, tolerating prose around the object
fn parse_outline(response: &str) -> Option<ReportOutline> {
    let trimmed = response.trim();
    if let Ok(outline) = serde_json::from_str(trimmed) {
        return Some(outline);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tandem_domain::{Phase, TurnRecord};

    /// Gateway that answers from a scripted queue and records requests
    struct ScriptedGateway {
        responses: Mutex<Vec<Result<String, GenerationError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationGateway for ScriptedGateway {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok("filler".to_string())
            } else {
                responses.remove(0)
            }
        }
    }

    fn topic() -> Topic {
        Topic::new("Plan a migration").unwrap()
    }

    fn transcript(turns: u32) -> Transcript {
        let mut t = Transcript::new();
        for n in 1..=turns {
            t.append(TurnRecord::new(
                n,
                if n % 2 == 1 { "A" } else { "B" },
                Phase::Divergent,
                format!("idea {}", n),
            ));
        }
        t
    }

    #[tokio::test]
    async fn test_report_follows_generated_outline() {
        let gateway = ScriptedGateway::new(vec![
            Ok(r#"{"title": "API Design Document", "sections": ["Authentication", "Storage"]}"#
                .to_string()),
            Ok("auth content".to_string()),
            Ok("storage content".to_string()),
        ]);
        let generator = ReportGenerator::new(Arc::clone(&gateway), "test-model", 5);

        let report = generator.generate(&topic(), &transcript(3)).await;

        assert!(report.starts_with("# API Design Document"));
        assert!(report.contains("**Topic:** Plan a migration"));
        assert!(report.contains("## Authentication\n\nauth content"));
        assert!(report.contains("## Storage\n\nstorage content"));

        // 3 turns under threshold 5: no summary call, so outline + 2 sections
        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].temperature, OUTLINE_TEMPERATURE);
        assert_eq!(requests[0].max_tokens, OUTLINE_MAX_TOKENS);
        assert_eq!(requests[1].temperature, SECTION_TEMPERATURE);
        assert_eq!(requests[1].max_tokens, SECTION_MAX_TOKENS);
        assert!(requests[1].messages[1].content.contains("Authentication"));
        assert!(requests[1].messages[1].content.contains("idea 2"));
    }

    #[tokio::test]
    async fn test_outline_json_embedded_in_prose() {
        let gateway = ScriptedGateway::new(vec![
            Ok("Here is the outline:\n{\"title\": \"Roadmap\", \"sections\": [\"Scope\"]}\nDone."
                .to_string()),
            Ok("scope content".to_string()),
        ]);
        let generator = ReportGenerator::new(gateway, "test-model", 5);

        let report = generator.generate(&topic(), &transcript(2)).await;
        assert!(report.starts_with("# Roadmap"));
        assert!(report.contains("## Scope"));
    }

    #[tokio::test]
    async fn test_unusable_outline_falls_back_to_default() {
        let gateway = ScriptedGateway::new(vec![Ok("no json here".to_string())]);
        let generator = ReportGenerator::new(Arc::clone(&gateway), "test-model", 5);

        let report = generator.generate(&topic(), &transcript(2)).await;

        assert!(report.starts_with("# Comprehensive Report: Plan a migration"));
        for section in DEFAULT_SECTIONS {
            assert!(report.contains(&format!("## {}", section)));
        }
        // Outline + one call per default section
        assert_eq!(gateway.requests.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_outline_failure_falls_back_to_default() {
        let gateway = ScriptedGateway::new(vec![Err(GenerationError::Timeout)]);
        let generator = ReportGenerator::new(gateway, "test-model", 5);

        let report = generator.generate(&topic(), &transcript(2)).await;
        assert!(report.starts_with("# Comprehensive Report: Plan a migration"));
        assert!(report.contains("## Executive Summary"));
    }

    #[tokio::test]
    async fn test_section_failure_becomes_placeholder() {
        let gateway = ScriptedGateway::new(vec![
            Ok(r#"{"title": "Doc", "sections": ["Good", "Bad"]}"#.to_string()),
            Ok("fine".to_string()),
            Err(GenerationError::Network("boom".to_string())),
        ]);
        let generator = ReportGenerator::new(gateway, "test-model", 5);

        let report = generator.generate(&topic(), &transcript(1)).await;
        assert!(report.contains("## Good\n\nfine"));
        assert!(report.contains("## Bad\n\n[Content generation failed]"));
    }

    #[tokio::test]
    async fn test_long_transcript_is_compacted_first() {
        let gateway = ScriptedGateway::new(vec![
            Ok("summary of turns 1-5".to_string()),
            Ok(r#"{"title": "Doc", "sections": ["Only"]}"#.to_string()),
            Ok("content".to_string()),
        ]);
        let generator = ReportGenerator::new(Arc::clone(&gateway), "test-model", 5);

        // 7 turns, threshold 5: one chunk summary precedes the outline call
        generator.generate(&topic(), &transcript(7)).await;

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].messages[1].content.contains("summary of turns 1-5"));
    }
}
