//! `SimilarityScorer` that asks a language model to rate candidates.

use std::sync::Arc;

use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};

use crate::ports::llm::{CompletionRequest, LlmClient};
use crate::ports::{PortError, SimilarityScorer};

const SYSTEM_PROMPT: &str = "You compare software component names. For each numbered \
candidate, rate from 0 to 1 how likely it refers to the same component as the query. \
Answer with JSON only, in the form {\"scores\": [0.0, ...]}, one score per candidate in order.";

/// Scores candidates with one LLM completion per query.
///
/// The client is async; calls are driven to completion on a private
/// current-thread runtime, so this must not be used from inside another runtime.
pub struct LlmSimilarityScorer {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_tokens: u32,
    runtime: Runtime,
}

impl LlmSimilarityScorer {
    /// Creates a scorer using `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be built.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, PortError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { llm, model: model.into(), max_tokens, runtime })
    }
}

#[derive(Deserialize)]
struct ScoreReply {
    scores: Vec<f32>,
}

fn prompt(query: &str, candidates: &[&str]) -> String {
    let mut text = format!("Query: {query}\nCandidates:\n");
    for (i, candidate) in candidates.iter().enumerate() {
        text.push_str(&format!("{}. {candidate}\n", i + 1));
    }
    text
}

/// Pulls the score list out of a reply, tolerating a Markdown code fence.
fn parse_scores(reply: &str) -> Result<Vec<f32>, PortError> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    let parsed: ScoreReply = serde_json::from_str(body.trim())
        .map_err(|e| PortError::from(format!("unexpected scorer reply: {e}")))?;
    Ok(parsed
        .scores
        .into_iter()
        .map(|s| if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 })
        .collect())
}

impl SimilarityScorer for LlmSimilarityScorer {
    fn score(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, PortError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let request =
            CompletionRequest::new(self.model.as_str(), prompt(query, candidates), self.max_tokens)
                .with_system(SYSTEM_PROMPT);
        let response = self.runtime.block_on(self.llm.complete(&request))?;
        tracing::debug!(
            query,
            candidates = candidates.len(),
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "scored candidates"
        );
        parse_scores(&response.text)
    }
}
