//! Per-source comparators.
//!
//! Each comparator is a pure function of the task facts and one bundle. They
//! share no state and may run in any order.

pub mod blueprint;
pub mod codebase;
pub mod requirements;
pub mod roadmap;

pub use blueprint::compare_blueprint;
pub use codebase::compare_codebase;
pub use requirements::compare_requirements;
pub use roadmap::compare_roadmap;

use crate::alias::AliasResolver;
use crate::extract::TaskFacts;
use crate::matcher::Matcher;

/// Longest excerpt of free text quoted in a finding.
const EXCERPT_CHARS: usize = 100;

/// Inputs shared by every comparator for one run.
#[derive(Clone, Copy)]
pub struct Comparison<'a> {
    /// Facts extracted from the task text.
    pub facts: &'a TaskFacts,
    /// Alias lookup for the run.
    pub aliases: &'a AliasResolver,
    /// Text matcher for fuzzy lookups.
    pub matcher: &'a dyn Matcher,
}

/// Shortens free text for inclusion in a finding.
pub(crate) fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}
