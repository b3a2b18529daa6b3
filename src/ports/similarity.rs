//! Semantic similarity port backing the optional AI-assisted matcher.

use super::PortError;

/// Scores how closely candidate strings relate to a query.
///
/// Implementations are not required to be deterministic. Callers must treat
/// any failure as "no opinion" rather than as a negative answer.
pub trait SimilarityScorer: Send + Sync {
    /// Returns one relevance score in `[0, 1]` per candidate, in candidate order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing service fails or answers in the wrong shape.
    fn score(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, PortError>;
}
