//! LLM client port. Only the semantic matcher's scorer talks to a model.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Boxed future returned by [`LlmClient::complete`], keeping the trait dyn-compatible.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, PortError>> + Send + 'a>>;

/// One single-turn completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Instruction sent as the system prompt.
    #[serde(default)]
    pub system: Option<String>,
    /// The user turn.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature. Scoring uses 0.
    #[serde(default)]
    pub temperature: f32,
}

impl CompletionRequest {
    /// A request with no system prompt and temperature 0.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.0,
        }
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Generated text plus token accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Concatenated text blocks.
    pub text: String,
    /// Input tokens billed.
    pub prompt_tokens: u32,
    /// Output tokens billed.
    pub completion_tokens: u32,
}

/// Sends completion requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Runs one completion.
    ///
    /// # Errors
    ///
    /// Returns an error for transport, authentication or API failures.
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;
}
