//! Service context bundling the port trait objects a command needs.

use std::sync::Arc;

use crate::adapters::live::{LiveFileSystem, LiveLlmClient};
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;

/// The external boundaries available to command handlers.
///
/// Commands take a `&ServiceContext` instead of constructing adapters, so
/// tests can swap in in-memory implementations.
pub struct ServiceContext {
    /// Filesystem for bundles, aliases, config and report output.
    pub fs: Box<dyn FileSystem>,
    /// Language model used by the semantic matcher. Shared with the scorer.
    pub llm: Arc<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a context backed by the real disk and the Anthropic API.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem), llm: Arc::new(LiveLlmClient::new()) }
    }
}
