//! Incremental context compaction
//!
//! Converts an unbounded transcript slice into one bounded text block per
//! generation call: a cumulative summary of older turns plus a verbatim
//! window of recent turns. The cumulative summary is maintained
//! incrementally, one chunk at a time, and memoized per boundary turn so
//! the whole session costs O(number of chunks) summary calls rather than
//! O(turns squared).

use crate::ports::generation::{GenerationGateway, GenerationRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tandem_domain::{Message, PromptTemplate, Topic, TurnRecord};
use tracing::{debug, warn};

/// Sampling temperature for summary calls (lower than turn generation,
/// summaries should be consistent)
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Output budget for a from-scratch chunk summary
const CHUNK_SUMMARY_MAX_TOKENS: u32 = 500;

/// Output budget for a merge-update summary
const MERGE_SUMMARY_MAX_TOKENS: u32 = 600;

/// Character budget per turn in the deterministic fallback summary
const FALLBACK_PREFIX_CHARS: usize = 100;

/// Compacts transcript slices into bounded context blocks
///
/// Owns the per-session summary cache, keyed by the boundary turn the
/// summary covers (turns `1..=boundary`). An entry is computed once and
/// never recomputed for the same key; a failed generation call caches its
/// deterministic fallback under the same key, so failures do not retrigger
/// on later, larger boundaries.
pub struct ContextCompactor<G> {
    gateway: Arc<G>,
    model: String,
    chunk_threshold: usize,
    cache: HashMap<usize, String>,
}

impl<G: GenerationGateway> ContextCompactor<G> {
    /// Create a compactor for one session
    ///
    /// # Panics
    /// Panics if `chunk_threshold` is zero; parameters are validated at
    /// configuration time, so a zero here is a programmer error.
    pub fn new(gateway: Arc<G>, model: impl Into<String>, chunk_threshold: usize) -> Self {
        assert!(chunk_threshold >= 1, "chunk_threshold must be at least 1");
        Self {
            gateway,
            model: model.into(),
            chunk_threshold,
            cache: HashMap::new(),
        }
    }

    /// Size of the verbatim window for a slice of length `len`
    ///
    /// Always in `1..=chunk_threshold` for non-empty slices: a multiple of
    /// the threshold shows a full window, not an empty one.
    pub fn verbatim_count(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match len % self.chunk_threshold {
            0 => self.chunk_threshold,
            n => n,
        }
    }

    /// Compact a transcript slice into one bounded history block
    ///
    /// Never fails: summary-call failures degrade to a deterministic
    /// fallback, and an empty slice yields an explicit marker block.
    /// The slice is only read; the compactor writes nothing but its cache.
    pub async fn compact(&mut self, topic: &Topic, slice: &[TurnRecord]) -> String {
        if slice.is_empty() {
            return PromptTemplate::history_block(None, &[]);
        }

        let verbatim_count = self.verbatim_count(slice.len());
        let boundary = slice.len() - verbatim_count;

        if boundary == 0 {
            // Early in the conversation: everything fits verbatim
            return PromptTemplate::history_block(None, slice);
        }

        let summary = self.cumulative_summary(topic, &slice[..boundary]).await;
        PromptTemplate::history_block(Some(&summary), &slice[boundary..])
    }

    /// Cumulative summary covering `prefix` (turns `1..=prefix.len()`)
    ///
    /// Materializes boundaries bottom-up in `chunk_threshold` steps —
    /// the iterative form of "summarize the first block from scratch,
    /// then fold each later block into the previous summary". Every
    /// boundary is cached before the next one builds on it, so later,
    /// larger boundaries reuse all earlier work.
    async fn cumulative_summary(&mut self, topic: &Topic, prefix: &[TurnRecord]) -> String {
        let end = prefix.len();

        // Boundary sequence: end, end - t, end - 2t, ... down into the
        // base block, then walked smallest-first.
        let mut boundaries = Vec::new();
        let mut e = end;
        while e > self.chunk_threshold {
            boundaries.push(e);
            e -= self.chunk_threshold;
        }
        boundaries.push(e);
        boundaries.reverse();

        let mut summary = String::new();
        let mut prev_end = 0usize;

        for &boundary in &boundaries {
            if let Some(cached) = self.cache.get(&boundary) {
                debug!(boundary, "summary cache hit");
                summary = cached.clone();
                prev_end = boundary;
                continue;
            }

            let text = if prev_end == 0 {
                self.summarize_chunk(topic, &prefix[..boundary]).await
            } else {
                self.merge_summary(topic, &summary, &prefix[prev_end..boundary], prev_end, boundary)
                    .await
            };

            self.cache.insert(boundary, text.clone());
            summary = text;
            prev_end = boundary;
        }

        summary
    }

    /// Summarize a first chunk from scratch with one generation call
    async fn summarize_chunk(&self, topic: &Topic, chunk: &[TurnRecord]) -> String {
        let start = chunk.first().map(|r| r.turn).unwrap_or(1);
        let end = chunk.last().map(|r| r.turn).unwrap_or(start);

        let request = self.summary_request(
            PromptTemplate::chunk_summary_prompt(topic, chunk, start, end),
            CHUNK_SUMMARY_MAX_TOKENS,
        );

        match self.gateway.generate(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(start, end, "summary response was empty, using fallback");
                Self::fallback_summary(chunk)
            }
            Err(e) => {
                warn!(start, end, error = %e, "summary generation failed, using fallback");
                Self::fallback_summary(chunk)
            }
        }
    }

    /// Fold a new chunk into an existing summary with one generation call
    async fn merge_summary(
        &self,
        topic: &Topic,
        prev_summary: &str,
        chunk: &[TurnRecord],
        prev_end: usize,
        end: usize,
    ) -> String {
        let request = self.summary_request(
            PromptTemplate::merge_summary_prompt(
                topic,
                prev_summary,
                chunk,
                prev_end as u32,
                end as u32,
            ),
            MERGE_SUMMARY_MAX_TOKENS,
        );

        match self.gateway.generate(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(prev_end, end, "summary update response was empty, using fallback");
                format!("{}\n\n{}", prev_summary, Self::fallback_summary(chunk))
            }
            Err(e) => {
                // Keep what we have and tack the new chunk on in degraded
                // form so the window still covers turns 1..=end
                warn!(prev_end, end, error = %e, "summary update failed, using fallback");
                format!("{}\n\n{}", prev_summary, Self::fallback_summary(chunk))
            }
        }
    }

    fn summary_request(&self, prompt: String, max_tokens: u32) -> GenerationRequest {
        GenerationRequest::new(
            self.model.clone(),
            vec![
                Message::system(PromptTemplate::summarizer_system()),
                Message::user(prompt),
            ],
        )
        .with_temperature(SUMMARY_TEMPERATURE)
        .with_max_tokens(max_tokens)
    }

    /// Deterministic non-LLM summary: one tagged prefix line per turn
    fn fallback_summary(chunk: &[TurnRecord]) -> String {
        chunk
            .iter()
            .map(|r| {
                let first_line = r.content.lines().next().unwrap_or("");
                let prefix: String = first_line.chars().take(FALLBACK_PREFIX_CHARS).collect();
                let ellipsis = if first_line.chars().count() > FALLBACK_PREFIX_CHARS {
                    "..."
                } else {
                    ""
                };
                format!("- {}: {}{}", r.speaker, prefix, ellipsis)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tandem_domain::Phase;

    /// Mock gateway that records every request and can be set to fail
    struct MockGateway {
        requests: Mutex<Vec<GenerationRequest>>,
        fail: Mutex<bool>,
    }

    impl MockGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: Mutex::new(false),
            })
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl GenerationGateway for MockGateway {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            let n = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request);
                requests.len()
            };
            if *self.fail.lock().unwrap() {
                Err(GenerationError::Network("connection refused".to_string()))
            } else {
                Ok(format!("summary {}", n))
            }
        }
    }

    fn slice(turns: usize) -> Vec<TurnRecord> {
        (1..=turns as u32)
            .map(|i| {
                let speaker = if i % 2 == 1 { "A" } else { "B" };
                TurnRecord::new(i, speaker, Phase::Convergent, format!("idea {i}"))
            })
            .collect()
    }

    fn topic() -> Topic {
        Topic::new("Plan a migration").unwrap()
    }

    #[test]
    fn test_verbatim_count_bounds() {
        let gateway = MockGateway::new();
        let compactor = ContextCompactor::new(gateway, "m", 5);
        assert_eq!(compactor.verbatim_count(0), 0);
        for len in 1..=23 {
            let v = compactor.verbatim_count(len);
            assert!((1..=5).contains(&v), "len {len} gave window {v}");
            if len <= 5 {
                assert_eq!(v, len);
            }
        }
        // Multiples of the threshold show a full window, never zero
        assert_eq!(compactor.verbatim_count(5), 5);
        assert_eq!(compactor.verbatim_count(10), 5);
        assert_eq!(compactor.verbatim_count(11), 1);
    }

    #[tokio::test]
    async fn test_empty_slice_yields_marker() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);
        let block = compactor.compact(&topic(), &[]).await;
        assert!(block.contains("(No previous discussion)"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_short_slice_all_verbatim_no_calls() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);
        let records = slice(5);
        let block = compactor.compact(&topic(), &records).await;
        assert!(!block.contains("<earlier_discussion_summary>"));
        for r in &records {
            assert!(block.contains(&r.content));
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_eleven_turns_threshold_five() {
        // 11 mod 5 = 1: verbatim window is turn 11 only, summary covers
        // boundary 10, which recursively materializes boundary 5.
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);
        let records = slice(11);
        let block = compactor.compact(&topic(), &records).await;

        assert!(block.contains("idea 11"));
        assert!(!block.contains("idea 10\n"));
        assert!(block.contains("<earlier_discussion_summary>"));
        // One from-scratch summary (turns 1-5) + one merge (through 10)
        assert_eq!(gateway.call_count(), 2);

        let requests = gateway.requests.lock().unwrap();
        assert!(requests[0].messages[1].content.contains("turns 1-5"));
        assert!(requests[1].messages[1].content.contains("Turns 6-10"));
    }

    #[tokio::test]
    async fn test_boundary_computed_at_most_once() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);
        let records = slice(11);

        compactor.compact(&topic(), &records).await;
        assert_eq!(gateway.call_count(), 2);

        // Same prefix again: full cache hit
        compactor.compact(&topic(), &records).await;
        assert_eq!(gateway.call_count(), 2);

        // Grown transcript: only the new boundary (15) is summarized
        let grown = slice(16);
        compactor.compact(&topic(), &grown).await;
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_summary_requests_use_summarizer_settings() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 3);
        compactor.compact(&topic(), &slice(7)).await;

        let requests = gateway.requests.lock().unwrap();
        assert!(!requests.is_empty());
        for request in requests.iter() {
            assert_eq!(request.temperature, SUMMARY_TEMPERATURE);
            assert_eq!(request.messages[0].content, PromptTemplate::summarizer_system());
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back_and_caches() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);
        let records = slice(11);

        gateway.set_fail(true);
        let block = compactor.compact(&topic(), &records).await;
        // Deterministic fallback: tagged prefix lines, session continues
        assert!(block.contains("- A: idea"));
        assert!(block.contains("- B: idea"));
        assert_eq!(gateway.call_count(), 2);

        // Backend recovers, but the degraded entries stay cached: no
        // retries for already-covered boundaries
        gateway.set_fail(false);
        compactor.compact(&topic(), &records).await;
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_merge_failure_keeps_previous_summary() {
        let gateway = MockGateway::new();
        let mut compactor = ContextCompactor::new(Arc::clone(&gateway), "m", 5);

        // Materialize boundary 5 successfully
        compactor.compact(&topic(), &slice(6)).await;
        assert_eq!(gateway.call_count(), 1);

        // Merge through 10 fails: prior summary text survives in the block
        gateway.set_fail(true);
        let block = compactor.compact(&topic(), &slice(11)).await;
        assert!(block.contains("summary 1"));
        assert!(block.contains("- B: idea 6"));
    }

    #[test]
    #[should_panic]
    fn test_zero_threshold_panics() {
        let gateway = MockGateway::new();
        let _ = ContextCompactor::new(gateway, "m", 0);
    }
}
