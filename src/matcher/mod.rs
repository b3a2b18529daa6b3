//! Pluggable text/entity matching used by the comparators.
//!
//! [`ExactMatcher`] is the deterministic default. [`SemanticMatcher`] adds an
//! external similarity scorer on top of it; whatever the scorer says, its
//! results always include the exact matcher's, so switching matchers can only
//! add matches.

mod exact;
mod semantic;

pub use exact::ExactMatcher;
pub use semantic::SemanticMatcher;

use crate::alias::AliasResolver;

/// A candidate that matched a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position of the candidate in the slice passed to [`Matcher::find`].
    pub index: usize,
    /// Relevance in `[0, 1]`.
    pub score: f32,
}

/// Finds which candidate strings refer to the same thing as a query.
pub trait Matcher: Send + Sync {
    /// Returns matching candidates ordered by descending score, then index.
    fn find(&self, aliases: &AliasResolver, query: &str, candidates: &[&str]) -> Vec<Candidate>;

    /// Returns `true` if identical inputs always produce identical output.
    fn is_deterministic(&self) -> bool;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

pub(crate) fn rank(mut found: Vec<Candidate>) -> Vec<Candidate> {
    found.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    found
}
