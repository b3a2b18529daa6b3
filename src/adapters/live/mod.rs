//! Live adapters for real external interactions.

pub mod filesystem;
pub mod llm;
pub mod similarity;

pub use filesystem::LiveFileSystem;
pub use llm::LiveLlmClient;
pub use similarity::LlmSimilarityScorer;
