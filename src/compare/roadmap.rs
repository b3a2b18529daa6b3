//! Task vs. planning state.

use crate::bundle::RoadmapContext;
use crate::model::{CheckResult, Evidence, Finding, FindingKind, SourceKind};

use super::Comparison;

/// Number of roadmap features listed as matches.
const MAX_FEATURES: usize = 3;

/// Longest feature title shown before it is cut.
const FEATURE_TITLE_CHARS: usize = 80;

/// Compares the task against the roadmap bundle.
///
/// Every precomputed roadmap row is a match. No rows at all is a single gap.
/// Sprint membership and fetch problems are reported as warnings only.
#[must_use]
pub fn compare_roadmap(cx: &Comparison<'_>, roadmap: &RoadmapContext) -> CheckResult {
    let mut result = CheckResult::new(SourceKind::Roadmap);

    for row in &roadmap.matches {
        let mut detail = format!(
            "Found in roadmap: {} | {} - {}",
            row.feature_id, row.component_id, row.component_name
        );
        let extras: Vec<String> = [("status", &row.status), ("owner", &row.owner)]
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
            .collect();
        if !extras.is_empty() {
            detail = format!("{detail} ({})", extras.join(", "));
        }
        result.push(
            Finding::new(FindingKind::Match, detail)
                .about(cx.aliases.resolve(&row.component_id))
                .citing(Evidence::Roadmap {
                    feature_id: row.feature_id.clone(),
                    component_id: row.component_id.clone(),
                }),
        );
    }

    if roadmap.matches.is_empty() {
        result.add_missing("Task not found in roadmap — needs to be added");
    } else if roadmap.is_in_current_sprint(&cx.facts.task, cx.aliases) {
        result.add_match("Task is in current sprint");
    } else {
        result.add_warning("Task found in roadmap but not in current sprint");
    }

    for feature in roadmap.features.iter().take(MAX_FEATURES) {
        let mut title: String = feature.name.chars().take(FEATURE_TITLE_CHARS).collect();
        if title.len() < feature.name.len() {
            title.push_str("...");
        }
        result.add_match(format!("Feature match: {} {title}", feature.id));
    }

    for error in &roadmap.fetch_errors {
        result.add_warning(format!("Roadmap fetch error: {error}"));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasResolver;
    use crate::bundle::{Feature, RoadmapMatch};
    use crate::extract::extract;
    use crate::matcher::ExactMatcher;
    use crate::model::Status;

    fn run(task: &str, roadmap: &RoadmapContext) -> CheckResult {
        let aliases = AliasResolver::default();
        let facts = extract(task, &aliases);
        let cx = Comparison { facts: &facts, aliases: &aliases, matcher: &ExactMatcher };
        compare_roadmap(&cx, roadmap)
    }

    fn nudge_row(sprint: Option<&str>) -> RoadmapMatch {
        RoadmapMatch {
            feature_id: "PSYC-F04".into(),
            component_id: "PSYC-F04-C01".into(),
            component_name: "Nudge Timing".into(),
            status: Some("In Progress".into()),
            owner: Some("Dana".into()),
            sprint: sprint.map(String::from),
        }
    }

    #[test]
    fn no_matches_is_exactly_one_gap() {
        let result = run("Add nudge cooldown", &RoadmapContext::default());
        assert_eq!(result.status(), Status::MissingInfo);
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].detail, "Task not found in roadmap — needs to be added");
        assert!(result.warnings.is_empty());
        assert!(result.matches.is_empty());
    }

    #[test]
    fn matches_cite_roadmap_ids() {
        let roadmap = RoadmapContext {
            matches: vec![nudge_row(Some("S7"))],
            current_sprint: Some("S7".into()),
            ..RoadmapContext::default()
        };
        let result = run("Add nudge cooldown", &roadmap);
        assert_eq!(result.status(), Status::Aligned);
        assert_eq!(
            result.matches[0].detail,
            "Found in roadmap: PSYC-F04 | PSYC-F04-C01 - Nudge Timing \
             (status: In Progress, owner: Dana)"
        );
        assert_eq!(
            result.matches[0].evidence,
            Some(Evidence::Roadmap {
                feature_id: "PSYC-F04".into(),
                component_id: "PSYC-F04-C01".into(),
            })
        );
        assert_eq!(result.matches[1].detail, "Task is in current sprint");
    }

    #[test]
    fn outside_sprint_only_warns() {
        let roadmap = RoadmapContext {
            matches: vec![nudge_row(None)],
            current_sprint: Some("S7".into()),
            ..RoadmapContext::default()
        };
        let result = run("Add nudge cooldown", &roadmap);
        assert_eq!(result.status(), Status::Aligned);
        assert_eq!(result.warnings[0].detail, "Task found in roadmap but not in current sprint");
    }

    #[test]
    fn lists_first_features_with_long_titles_cut() {
        let feature = |id: &str, name: String| Feature { id: id.into(), name, status: None };
        let roadmap = RoadmapContext {
            matches: vec![nudge_row(None)],
            features: vec![
                feature("PSYC-F04", "Nudge Timing".into()),
                feature("PSYC-F05", "x".repeat(90)),
                feature("PSYC-F06", "Coach Digest".into()),
                feature("PSYC-F07", "Session Replay".into()),
            ],
            ..RoadmapContext::default()
        };
        let result = run("Add nudge cooldown", &roadmap);
        let features: Vec<&str> = result
            .matches
            .iter()
            .map(|m| m.detail.as_str())
            .filter(|d| d.starts_with("Feature match"))
            .collect();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0], "Feature match: PSYC-F04 Nudge Timing");
        assert_eq!(features[1], format!("Feature match: PSYC-F05 {}...", "x".repeat(80)));
        assert_eq!(features[2], "Feature match: PSYC-F06 Coach Digest");
    }

    #[test]
    fn fetch_errors_surface_as_warnings() {
        let roadmap = RoadmapContext {
            fetch_errors: vec!["Monday.com fetch failed".into()],
            ..RoadmapContext::default()
        };
        let result = run("Add nudge cooldown", &roadmap);
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.warnings[0].detail, "Roadmap fetch error: Monday.com fetch failed");
    }
}
