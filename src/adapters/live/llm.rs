//! Live `LlmClient` backed by the Anthropic messages API.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
use crate::ports::PortError;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Calls the Anthropic API. The key is read from `ANTHROPIC_API_KEY` per request.
pub struct LiveLlmClient {
    client: Client,
}

impl LiveLlmClient {
    /// Creates a client with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let api_key = env::var(API_KEY_VAR).map_err(|_| {
                PortError::from(format!("{API_KEY_VAR} environment variable not set"))
            })?;

            let body = MessagesRequest {
                model: &request.model,
                max_tokens: request.max_tokens,
                temperature: request.temperature,
                system: request.system.as_deref(),
                messages: [Message { role: "user", content: &request.prompt }],
            };

            tracing::debug!(model = %request.model, "sending completion request");
            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| PortError::from(format!("Anthropic API request failed: {e}")))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| PortError::from(format!("Failed to read Anthropic response: {e}")))?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(format!("Anthropic API error ({}): {msg}", status.as_u16()).into());
            }

            let parsed: MessagesResponse = serde_json::from_str(&text)
                .map_err(|e| PortError::from(format!("Failed to parse Anthropic response: {e}")))?;

            Ok(CompletionResponse {
                text: parsed.content.into_iter().map(|block| block.text).collect(),
                prompt_tokens: parsed.usage.input_tokens,
                completion_tokens: parsed.usage.output_tokens,
            })
        })
    }
}
