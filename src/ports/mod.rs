//! Port traits defining external boundaries.
//!
//! The reconciliation core never performs I/O itself. Everything that touches
//! disk or the network sits behind one of these traits; real implementations
//! live in `src/adapters/`.

pub mod filesystem;
pub mod llm;
pub mod similarity;

use std::error::Error;

pub use filesystem::FileSystem;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use similarity::SimilarityScorer;

/// Boxed error type shared by all ports.
pub type PortError = Box<dyn Error + Send + Sync>;
