//! Task vs. acceptance and success criteria.

use crate::bundle::requirements::non_blank;
use crate::bundle::{RequirementsContext, ScopeItem};
use crate::model::{CheckResult, Evidence, Finding, FindingKind, SourceKind};

use super::{excerpt, Comparison};

/// Number of requirement files listed as matches.
const MAX_REQUIREMENT_FILES: usize = 3;

/// Compares the task against the requirements bundle.
///
/// Acceptance criteria may come from the task-level field or from scope items
/// that match one of the task's components. Absent and blank criteria are both
/// gaps, reported with different wording.
#[must_use]
pub fn compare_requirements(
    cx: &Comparison<'_>,
    requirements: &RequirementsContext,
) -> CheckResult {
    let mut result = CheckResult::new(SourceKind::Requirements);

    let mut has_acceptance = false;
    if let Some(criteria) = requirements.acceptance() {
        has_acceptance = true;
        result.push(
            Finding::new(
                FindingKind::Match,
                format!("Acceptance criteria: {}", excerpt(criteria)),
            )
            .citing(Evidence::Requirement { name: "acceptance_criteria".into() }),
        );
    }
    for item in matched_scope(cx, &requirements.scope) {
        let Some(criterion) = non_blank(item.acceptance_criterion.as_deref()) else {
            continue;
        };
        has_acceptance = true;
        result.push(
            Finding::new(
                FindingKind::Match,
                format!("Acceptance criteria for '{}': {}", item.name, excerpt(criterion)),
            )
            .about(cx.aliases.resolve(&item.name))
            .citing(Evidence::Requirement { name: item.name.clone() }),
        );
    }
    if !has_acceptance {
        if requirements.acceptance_criteria.is_some() {
            result.add_missing("Acceptance criteria field is empty");
        } else {
            result.add_missing("No acceptance criteria defined for this task");
        }
    }

    match requirements.success() {
        Some(criteria) => result.push(
            Finding::new(FindingKind::Match, format!("Success criteria: {}", excerpt(criteria)))
                .citing(Evidence::Requirement { name: "success_criteria".into() }),
        ),
        None => result.add_missing("No success criteria defined for this task"),
    }

    if let Some(hours) = requirements.estimated_hours {
        result.add_match(format!("Estimated hours: {hours}"));
    }
    if let Some(loc) = requirements.estimated_loc {
        result.add_match(format!("Estimated LOC: ~{loc}"));
    }
    for file in requirements.requirement_files.iter().take(MAX_REQUIREMENT_FILES) {
        result.push(
            Finding::new(FindingKind::Match, format!("Requirement file: {}", file.name))
                .citing(Evidence::Requirement { name: file.name.clone() }),
        );
    }

    result
}

/// Scope items that refer to one of the task's components.
fn matched_scope<'a>(cx: &Comparison<'_>, scope: &'a [ScopeItem]) -> Vec<&'a ScopeItem> {
    if scope.is_empty() {
        return Vec::new();
    }
    let names: Vec<&str> = scope.iter().map(|s| s.name.as_str()).collect();
    let mut hits: Vec<usize> = scope
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            cx.facts.mentions(&cx.aliases.resolve(&item.name))
                || item
                    .id
                    .as_deref()
                    .is_some_and(|id| cx.facts.mentions(&cx.aliases.resolve(id)))
        })
        .map(|(index, _)| index)
        .collect();
    for component in &cx.facts.components {
        let found = cx.matcher.find(cx.aliases, &component.surface, &names);
        hits.extend(found.iter().map(|c| c.index));
    }
    hits.sort_unstable();
    hits.dedup();
    hits.into_iter().map(|index| &scope[index]).collect()
}
