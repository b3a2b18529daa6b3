use crate::alias::AliasResolver;
use crate::ports::similarity::SimilarityScorer;

use super::{rank, Candidate, ExactMatcher, Matcher};

/// Exact matching widened by an external similarity scorer.
///
/// Candidates scoring at or above `threshold` are added to the exact matcher's
/// results. If the scorer fails, or returns the wrong number of scores, the
/// exact results are returned unchanged and the degradation is logged.
pub struct SemanticMatcher {
    scorer: Box<dyn SimilarityScorer>,
    threshold: f32,
}

impl SemanticMatcher {
    /// Creates a matcher over `scorer`. `threshold` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(scorer: Box<dyn SimilarityScorer>, threshold: f32) -> Self {
        Self { scorer, threshold: threshold.clamp(0.0, 1.0) }
    }

    /// The score a candidate needs to count as a match.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Matcher for SemanticMatcher {
    fn find(&self, aliases: &AliasResolver, query: &str, candidates: &[&str]) -> Vec<Candidate> {
        let mut found = ExactMatcher.find(aliases, query, candidates);
        if candidates.is_empty() {
            return found;
        }

        let scores = match self.scorer.score(query, candidates) {
            Ok(scores) if scores.len() == candidates.len() => scores,
            Ok(scores) => {
                tracing::warn!(
                    query,
                    expected = candidates.len(),
                    got = scores.len(),
                    "similarity scorer returned wrong number of scores, using exact matches"
                );
                return found;
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "similarity scorer failed, using exact matches");
                return found;
            }
        };

        for (index, score) in scores.into_iter().enumerate() {
            if !score.is_finite() || score < self.threshold {
                continue;
            }
            if let Some(existing) = found.iter_mut().find(|c| c.index == index) {
                existing.score = existing.score.max(score);
            } else {
                found.push(Candidate { index, score: score.min(1.0) });
            }
        }
        rank(found)
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "semantic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedScorer;

    fn matcher(scores: Option<Vec<f32>>, threshold: f32) -> SemanticMatcher {
        SemanticMatcher::new(Box::new(FixedScorer { scores }), threshold)
    }

    #[test]
    fn adds_candidates_above_threshold() {
        let aliases = AliasResolver::default();
        let m = matcher(Some(vec![0.9, 0.2, 0.75]), 0.75);
        let candidates = ["talk-time ratio", "billing", "airtime"];
        let found = m.find(&aliases, "speaker dominance", &candidates);
        let indices: Vec<usize> = found.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn never_drops_exact_matches() {
        let aliases = AliasResolver::default();
        let m = matcher(Some(vec![0.0, 0.0]), 0.75);
        let found = m.find(&aliases, "Nudge Engine", &["nudge_engine", "billing"]);
        assert_eq!(found, vec![Candidate { index: 0, score: 1.0 }]);
    }

    #[test]
    fn scorer_failure_degrades_to_exact() {
        let aliases = AliasResolver::default();
        let candidates = ["nudge_engine", "cooldown timer"];
        let m = matcher(None, 0.5);
        assert_eq!(
            m.find(&aliases, "Nudge Engine", &candidates),
            ExactMatcher.find(&aliases, "Nudge Engine", &candidates)
        );
    }

    #[test]
    fn short_score_list_degrades_to_exact() {
        let aliases = AliasResolver::default();
        let m = matcher(Some(vec![0.99]), 0.5);
        assert!(m.find(&aliases, "timeline", &["billing", "invoices"]).is_empty());
        assert!(!m.is_deterministic());
    }

    #[test]
    fn threshold_is_clamped() {
        assert!((matcher(None, 3.0).threshold() - 1.0).abs() < f32::EPSILON);
    }
}
