//! Task vs. implementation state.
//!
//! Existing code that overlaps the task is reported as a reuse warning.
//! Dependencies the task needs but the project lacks are gaps. Nothing here
//! produces a conflict.

use std::collections::BTreeSet;

use crate::bundle::CodebaseContext;
use crate::model::{CheckResult, Evidence, Finding, FindingKind, SourceKind};

use super::Comparison;

/// Number of relevant files listed as matches.
const MAX_RELATED_FILES: usize = 5;

/// Number of overlapping implementations listed as warnings.
const MAX_SIMILAR_IMPLEMENTATIONS: usize = 5;

/// Task words that mark frontend work.
const FRONTEND_WORDS: &[&str] = &["frontend", "ui", "component", "react"];

/// Compares the task against the codebase bundle.
#[must_use]
pub fn compare_codebase(cx: &Comparison<'_>, codebase: &CodebaseContext) -> CheckResult {
    let mut result = CheckResult::new(SourceKind::Codebase);
    if codebase.is_empty() {
        result.add_missing("No relevant code found in codebase");
        return result;
    }

    for file in codebase.files.iter().take(MAX_RELATED_FILES) {
        result.push(
            Finding::new(FindingKind::Match, format!("Related file: {}", file.path))
                .citing(Evidence::File { path: file.path.clone() }),
        );
    }

    let names: Vec<&str> =
        codebase.existing_implementations.iter().map(|i| i.name.as_str()).collect();
    let queries = cx
        .facts
        .components
        .iter()
        .map(|c| c.surface.as_str())
        .chain(cx.facts.keywords.iter().map(String::as_str));
    let mut similar: BTreeSet<usize> = BTreeSet::new();
    if !names.is_empty() {
        for query in queries {
            similar.extend(cx.matcher.find(cx.aliases, query, &names).iter().map(|c| c.index));
        }
    }

    for &index in similar.iter().take(MAX_SIMILAR_IMPLEMENTATIONS) {
        let implementation = &codebase.existing_implementations[index];
        let mut finding = Finding::new(
            FindingKind::Warning,
            match &implementation.location {
                Some(location) => {
                    format!("Similar implementation exists: {} ({location})", implementation.name)
                }
                None => format!("Similar implementation exists: {}", implementation.name),
            },
        )
        .about(cx.aliases.resolve(&implementation.name));
        if let Some(location) = &implementation.location {
            finding = finding.citing(Evidence::File { path: location.clone() });
        }
        result.push(finding);
    }
    if similar.len() > MAX_SIMILAR_IMPLEMENTATIONS {
        result.add_warning(format!(
            "...and {} more similar implementations",
            similar.len() - MAX_SIMILAR_IMPLEMENTATIONS
        ));
    }
    if !similar.is_empty() {
        result.add_warning("Consider extending existing code rather than creating new");
    }

    for dependency in &cx.facts.dependencies {
        let available = codebase
            .available_dependencies
            .iter()
            .any(|candidate| cx.aliases.equivalent(candidate, dependency));
        if available {
            result.add_match(format!("Dependency '{dependency}' is available"));
        } else {
            result.add_missing(format!("Dependency '{dependency}' is not available"));
        }
    }

    add_language_matches(&mut result, &cx.facts.task, codebase);
    result
}

fn add_language_matches(result: &mut CheckResult, task: &str, codebase: &CodebaseContext) {
    let uses = |language: &str| {
        codebase
            .files
            .iter()
            .any(|f| f.language.as_deref().is_some_and(|l| l.eq_ignore_ascii_case(language)))
    };
    let task = task.to_lowercase();
    let words: Vec<&str> = task.split(|c: char| !c.is_alphanumeric()).collect();

    if uses("python") && !words.contains(&"python") {
        result.add_match("Codebase uses Python, task appears compatible");
    }
    if uses("typescript") && words.iter().any(|w| FRONTEND_WORDS.contains(w)) {
        result.add_match("Codebase uses TypeScript, frontend task compatible");
    }
}
