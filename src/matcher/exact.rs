use crate::alias::{normalize, AliasResolver};

use super::{rank, Candidate, Matcher};

/// Shortest normalized form allowed to match by containment.
const MIN_SUBSTRING_LEN: usize = 4;

/// Score for a containment hit.
const SUBSTRING_SCORE: f32 = 0.8;

/// Canonical equality or normalized substring containment.
///
/// `"Nudge"` matches `"Nudge Engine"` by containment; `"UI"` matches nothing
/// by containment because it is too short to be meaningful.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl Matcher for ExactMatcher {
    fn find(&self, aliases: &AliasResolver, query: &str, candidates: &[&str]) -> Vec<Candidate> {
        let canonical = aliases.resolve(query);
        let needle = normalize(query);
        let found = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                if aliases.resolve(candidate) == canonical {
                    return Some(Candidate { index, score: 1.0 });
                }
                let hay = normalize(candidate);
                let (short, long) =
                    if needle.len() <= hay.len() { (&needle, &hay) } else { (&hay, &needle) };
                (short.len() >= MIN_SUBSTRING_LEN && long.contains(short.as_str()))
                    .then_some(Candidate { index, score: SUBSTRING_SCORE })
            })
            .collect();
        rank(found)
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::alias::AliasTable;

    #[test]
    fn canonical_hit_outranks_substring() {
        let aliases = AliasResolver::default();
        let candidates = ["Nudge", "Nudge Engine", "Billing"];
        let found = ExactMatcher.find(&aliases, "nudge engine", &candidates);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Candidate { index: 1, score: 1.0 });
        assert_eq!(found[1].index, 0);
    }

    #[test]
    fn aliases_count_as_equal() {
        let mut components = BTreeMap::new();
        components.insert("flashpoint_detector".to_string(), vec!["FD".to_string()]);
        let aliases = AliasResolver::new(&AliasTable { components, out_of_scope: vec![] });
        assert!(!ExactMatcher.find(&aliases, "FD", &["Flashpoint Detector"]).is_empty());
    }

    #[test]
    fn short_names_do_not_match_by_containment() {
        let aliases = AliasResolver::default();
        assert!(ExactMatcher.find(&aliases, "UI", &["Guide Builder"]).is_empty());
    }

    #[test]
    fn output_is_stable() {
        let aliases = AliasResolver::default();
        let candidates = ["tone_shift", "ToneShiftDetector", "shift"];
        let first = ExactMatcher.find(&aliases, "Tone Shift", &candidates);
        for _ in 0..5 {
            assert_eq!(ExactMatcher.find(&aliases, "Tone Shift", &candidates), first);
        }
        assert!(ExactMatcher.is_deterministic());
    }
}
