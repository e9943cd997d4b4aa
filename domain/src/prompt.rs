//! Prompt templates for turn generation and summary maintenance

use crate::topic::Topic;
use crate::transcript::TurnRecord;

/// Templates for the prompts sent at each stage of a session
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for summary generation calls
    pub fn summarizer_system() -> &'static str {
        "You are a helpful assistant that summarizes planning discussions."
    }

    /// User prompt for a divergent-phase turn
    ///
    /// Shows the persona's own prior ideas verbatim and instructs it to
    /// work independently.
    pub fn divergent_prompt(
        topic: &Topic,
        own_history: &[TurnRecord],
        current_turn: u32,
        total_turns: u32,
    ) -> String {
        let mut prompt = format!(
            r#"<task>{}</task>

<phase>Independent Ideation</phase>
<progress>
  <turn>{}/{}</turn>
</progress>

<instruction>
Generate ONE detailed, specific planning step or idea.
Work independently - DO NOT reference or build upon your partner's ideas.
Focus on your unique domain expertise.
</instruction>

"#,
            topic,
            current_turn + 1,
            total_turns
        );

        if !own_history.is_empty() {
            prompt.push_str("<previous_ideas>\n");
            for record in own_history {
                prompt.push_str(&format!(
                    "<idea turn=\"{}\" agent=\"{}\">\n{}\n</idea>\n\n",
                    record.turn, record.speaker, record.content
                ));
            }
            prompt.push_str("</previous_ideas>\n\n");
        }

        prompt.push_str("Generate your next planning step:");
        prompt
    }

    /// User prompt for a convergent-phase turn
    ///
    /// `history_block` is the compacted context produced by the compactor.
    pub fn convergent_prompt(
        topic: &Topic,
        history_block: &str,
        current_turn: u32,
        total_turns: u32,
    ) -> String {
        let progress_pct = if total_turns > 0 {
            (current_turn * 100) / total_turns
        } else {
            0
        };

        format!(
            r#"<task>{}</task>

<phase>Collaborative Discussion</phase>
<progress>
  <turn>{}/{}</turn>
  <percentage>{}%</percentage>
</progress>

{}

<instruction>
- Generate ONE refined or integrated planning step that:
  1. Builds upon or integrates ideas from both agents
  2. Advances the plan toward completion
  3. Focuses on synthesis and cross-domain integration
- Refrain from followup questions or requests for clarification.
</instruction>

<stage_guidance>
{}
</stage_guidance>

Generate your next planning step:"#,
            topic,
            current_turn + 1,
            total_turns,
            progress_pct,
            history_block,
            Self::stage_guidance(progress_pct)
        )
    }

    /// Guidance that shifts as the convergent phase progresses
    pub fn stage_guidance(progress_pct: u32) -> &'static str {
        if progress_pct < 40 {
            "Early collaboration - focus on exploring connections between ideas."
        } else if progress_pct < 75 {
            "Mid collaboration - focus on integration and identifying dependencies."
        } else {
            "Final collaboration - focus on consolidation and creating a coherent roadmap."
        }
    }

    /// User prompt for summarizing a first chunk from scratch
    pub fn chunk_summary_prompt(topic: &Topic, chunk: &[TurnRecord], start: u32, end: u32) -> String {
        format!(
            r#"Summarize the following {} turns of a multi-agent planning discussion.

TASK: {}

DISCUSSION (turns {}-{}):
{}

Provide a concise summary that captures:
1. Key planning steps or ideas proposed by each agent
2. Important decisions or agreements
3. Any unresolved issues or dependencies

Keep the summary under 300 words. Be specific and preserve important details."#,
            chunk.len(),
            topic,
            start,
            end,
            Self::format_turns_verbatim(chunk)
        )
    }

    /// User prompt for folding a new chunk into an existing summary
    pub fn merge_summary_prompt(
        topic: &Topic,
        prev_summary: &str,
        chunk: &[TurnRecord],
        prev_end: u32,
        end: u32,
    ) -> String {
        format!(
            r#"Update the following conversation summary with the latest discussion steps.

TASK: {}

EXISTING SUMMARY (Turns 1-{}):
{}

LATEST DISCUSSION (Turns {}-{}):
{}

INSTRUCTION: Create a new, consolidated summary covering turns 1-{}. Integrate the new information seamlessly. Focus on key decisions, plan progressions, and open dependencies. Keep it concise (under 400 words)."#,
            topic,
            prev_end,
            prev_summary,
            prev_end + 1,
            end,
            Self::format_turns_verbatim(chunk),
            end
        )
    }

    /// Format records exactly as they were, preserving all content
    pub fn format_turns_verbatim(records: &[TurnRecord]) -> String {
        records
            .iter()
            .map(|r| format!("Turn {} - {}:\n{}", r.turn, r.speaker, r.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Assemble the bounded history block shown in convergent turns
    ///
    /// Always yields a non-empty block: an empty slice produces an explicit
    /// marker so downstream prompt assembly never silently loses a section.
    pub fn history_block(summary: Option<&str>, recent: &[TurnRecord]) -> String {
        if summary.is_none() && recent.is_empty() {
            return "<conversation_history>\n  <recent_discussion>\n    (No previous discussion)\n  </recent_discussion>\n</conversation_history>"
                .to_string();
        }

        let mut block = String::from("<conversation_history>\n");

        if let Some(summary) = summary {
            block.push_str(&format!(
                "  <earlier_discussion_summary>\n    {}\n  </earlier_discussion_summary>\n\n",
                summary
            ));
        }

        block.push_str("  <recent_discussion>\n");
        for record in recent {
            block.push_str(&format!(
                "    <message turn=\"{}\" agent=\"{}\">\n      {}\n    </message>\n\n",
                record.turn, record.speaker, record.content
            ));
        }
        block.push_str("  </recent_discussion>\n</conversation_history>");

        block
    }

    /// System prompt for the report outline call
    pub fn report_outline_system() -> &'static str {
        "You are an expert documentarian capable of synthesizing complex discussions into professional artifacts."
    }

    /// User prompt asking for a document title and table of contents
    ///
    /// The backend must answer with a single JSON object so the caller can
    /// parse `title` and `sections` out of it.
    pub fn report_outline_prompt(context: &str) -> String {
        format!(
            r#"Review this summary of a multi-agent collaboration session:

{}

TASK: Determine the most appropriate type of formal document to generate from this discussion (e.g., 'Software Architecture Design', 'Strategic Roadmap', 'Research Summary', 'Project Proposal').
Then, propose a logical Table of Contents (sections) for this document.
Structure the sections by logical themes, strategies, or components, NOT chronologically.
Do NOT include generic 'Introduction' or 'Conclusion' sections unless critical.

Return ONLY a JSON object with this format:
{{
  "title": "The Document Title",
  "sections": ["Section 1", "Section 2", "Section 3"]
}}"#,
            context
        )
    }

    /// System prompt for the per-section synthesis calls
    pub fn report_section_system() -> &'static str {
        "You are a senior technical writer creating a formal design document."
    }

    /// User prompt for one section of the final report
    pub fn report_section_prompt(
        section_title: &str,
        doc_title: &str,
        topic: &Topic,
        context: &str,
    ) -> String {
        format!(
            r#"Write the '{}' section of the '{}' for the topic: {}.

SOURCE MATERIAL (Conversation History):
{}

INSTRUCTIONS:
- Synthesize all relevant points discussed about this specific section.
- Adopt a professional tone suitable for a '{}'.
- Resolve any initial conflicts by presenting the *final* evolved solution.
- Use technical language and standard Markdown formatting.
- Do NOT introduce yourself. Just write the document content."#,
            section_title, doc_title, topic, context, doc_title
        )
    }
}
