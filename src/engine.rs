//! The alignment engine: task text and bundles in, one report out.

use std::fmt;
use std::str::FromStr;

use crate::alias::AliasResolver;
use crate::bundle::ContextBundles;
use crate::coherence::check_coherence;
use crate::compare::{
    compare_blueprint, compare_codebase, compare_requirements, compare_roadmap, Comparison,
};
use crate::error::{AlignError, Result};
use crate::extract::{extract, TaskFacts};
use crate::matcher::Matcher;
use crate::model::{AlignmentReport, CheckResult, SourceKind};

/// Which checks a run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSelection {
    sources: Vec<SourceKind>,
    coherence: bool,
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl CheckSelection {
    /// Every source plus coherence.
    #[must_use]
    pub fn all() -> Self {
        Self { sources: SourceKind::SOURCES.to_vec(), coherence: true }
    }

    /// Builds a selection from individual checks. Order and duplicates are ignored.
    #[must_use]
    pub fn of(kinds: &[SourceKind]) -> Self {
        let mut sources: Vec<SourceKind> =
            kinds.iter().copied().filter(|k| *k != SourceKind::Coherence).collect();
        sources.sort();
        sources.dedup();
        Self { sources, coherence: kinds.contains(&SourceKind::Coherence) }
    }

    /// The per-source checks, in report order.
    #[must_use]
    pub fn sources(&self) -> &[SourceKind] {
        &self.sources
    }

    /// Returns `true` if `source` is selected.
    #[must_use]
    pub fn includes(&self, source: SourceKind) -> bool {
        if source == SourceKind::Coherence {
            self.coherence
        } else {
            self.sources.contains(&source)
        }
    }

    /// Coherence needs at least two sources to compare.
    #[must_use]
    pub fn runs_coherence(&self) -> bool {
        self.includes(SourceKind::Coherence) && self.sources.len() >= 2
    }
}

impl FromStr for CheckSelection {
    type Err = AlignError;

    /// Parses a comma-separated list such as `blueprint,roadmap,coherence`.
    fn from_str(s: &str) -> Result<Self> {
        let mut kinds = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let kind = match part.to_lowercase().as_str() {
                "blueprint" => SourceKind::Blueprint,
                "codebase" => SourceKind::Codebase,
                "roadmap" => SourceKind::Roadmap,
                "requirements" => SourceKind::Requirements,
                "coherence" => SourceKind::Coherence,
                "all" => return Ok(Self::all()),
                other => {
                    return Err(AlignError::Config(format!(
                        "unknown check '{other}' (expected blueprint, codebase, roadmap, \
                         requirements, coherence or all)"
                    )))
                }
            };
            kinds.push(kind);
        }
        if kinds.is_empty() {
            return Err(AlignError::Config("no checks selected".to_string()));
        }
        Ok(Self::of(&kinds))
    }
}

impl fmt::Display for CheckSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.sources.iter().map(|s| s.name().to_lowercase()).collect();
        if self.coherence {
            names.push("coherence".to_string());
        }
        f.write_str(&names.join(","))
    }
}

/// Runs every selected check for a task and aggregates the verdict.
///
/// The engine holds no mutable state; one instance can check many tasks.
pub struct Engine<'a> {
    aliases: &'a AliasResolver,
    matcher: &'a dyn Matcher,
    selection: CheckSelection,
}

impl<'a> Engine<'a> {
    /// Creates an engine running every check.
    #[must_use]
    pub fn new(aliases: &'a AliasResolver, matcher: &'a dyn Matcher) -> Self {
        Self { aliases, matcher, selection: CheckSelection::all() }
    }

    /// Restricts the checks this engine runs.
    #[must_use]
    pub fn with_selection(mut self, selection: CheckSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Extracts task facts with this engine's alias table.
    #[must_use]
    pub fn facts(&self, task: &str) -> TaskFacts {
        extract(task, self.aliases)
    }

    /// Checks `task` against the bundles.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] if a selected bundle violates its
    /// structural contract. Missing or contradicting information is never an
    /// error; it is reported in the findings.
    pub fn check(&self, task: &str, bundles: &ContextBundles) -> Result<AlignmentReport> {
        let facts = self.facts(task);
        self.check_facts(&facts, bundles)
    }

    /// Checks already-extracted task facts against the bundles.
    ///
    /// # Errors
    ///
    /// See [`Engine::check`].
    pub fn check_facts(
        &self,
        facts: &TaskFacts,
        bundles: &ContextBundles,
    ) -> Result<AlignmentReport> {
        self.validate(bundles)?;
        tracing::info!(
            task = %facts.task,
            components = facts.components.len(),
            flows = facts.flows.len(),
            dependencies = facts.dependencies.len(),
            matcher = self.matcher.name(),
            deterministic = self.matcher.is_deterministic(),
            checks = %self.selection,
            "checking task alignment"
        );

        let cx = Comparison { facts, aliases: self.aliases, matcher: self.matcher };
        let mut checks: Vec<CheckResult> = self
            .selection
            .sources()
            .iter()
            .map(|source| match source {
                SourceKind::Blueprint => compare_blueprint(&cx, &bundles.blueprint),
                SourceKind::Codebase => compare_codebase(&cx, &bundles.codebase),
                SourceKind::Roadmap => compare_roadmap(&cx, &bundles.roadmap),
                SourceKind::Requirements => compare_requirements(&cx, &bundles.requirements),
                SourceKind::Coherence => CheckResult::new(SourceKind::Coherence),
            })
            .collect();

        if self.selection.runs_coherence() {
            checks.push(check_coherence(bundles, self.aliases, self.selection.sources()));
        }

        for check in &checks {
            tracing::debug!(
                source = %check.source,
                status = %check.status(),
                matches = check.matches.len(),
                conflicts = check.conflicts.len(),
                missing = check.missing.len(),
                warnings = check.warnings.len(),
                "check finished"
            );
        }

        let report = AlignmentReport::new(facts.task.clone(), checks);
        tracing::info!(status = %report.overall_status(), "alignment check complete");
        Ok(report)
    }

    fn validate(&self, bundles: &ContextBundles) -> Result<()> {
        for source in self.selection.sources() {
            match source {
                SourceKind::Blueprint => bundles.blueprint.validate()?,
                SourceKind::Codebase => bundles.codebase.validate()?,
                SourceKind::Roadmap => bundles.roadmap.validate()?,
                SourceKind::Requirements => bundles.requirements.validate()?,
                SourceKind::Coherence => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::RoadmapMatch;
    use crate::matcher::ExactMatcher;
    use crate::model::Status;

    #[test]
    fn parses_selection_lists() {
        let selection: CheckSelection = "roadmap, Blueprint,coherence".parse().unwrap();
        assert_eq!(selection.sources(), &[SourceKind::Blueprint, SourceKind::Roadmap]);
        assert!(selection.runs_coherence());
        assert_eq!(selection.to_string(), "blueprint,roadmap,coherence");

        assert_eq!("all".parse::<CheckSelection>().unwrap(), CheckSelection::all());
        assert!("blueprint,weather".parse::<CheckSelection>().is_err());
        assert!(" , ".parse::<CheckSelection>().is_err());
    }

    #[test]
    fn coherence_needs_two_sources() {
        let selection = CheckSelection::of(&[SourceKind::Roadmap, SourceKind::Coherence]);
        assert!(selection.includes(SourceKind::Coherence));
        assert!(!selection.runs_coherence());
    }

    #[test]
    fn runs_every_check_in_report_order() {
        let aliases = AliasResolver::default();
        let engine = Engine::new(&aliases, &ExactMatcher);
        let report = engine.check("Add nudge cooldown", &ContextBundles::default()).unwrap();
        let order: Vec<SourceKind> = report.checks().iter().map(|c| c.source).collect();
        assert_eq!(
            order,
            vec![
                SourceKind::Blueprint,
                SourceKind::Codebase,
                SourceKind::Roadmap,
                SourceKind::Requirements,
                SourceKind::Coherence,
            ]
        );
        assert_eq!(report.overall_status(), Status::MissingInfo);
        assert_eq!(report.overall_status(), report.compute_overall_status());
    }

    #[test]
    fn skipped_sources_are_absent() {
        let aliases = AliasResolver::default();
        let engine = Engine::new(&aliases, &ExactMatcher)
            .with_selection(CheckSelection::of(&[SourceKind::Roadmap, SourceKind::Coherence]));
        let report = engine.check("Add nudge cooldown", &ContextBundles::default()).unwrap();
        assert_eq!(report.checks().len(), 1);
        assert!(report.check(SourceKind::Blueprint).is_none());
        assert!(report.check(SourceKind::Coherence).is_none());
    }

    #[test]
    fn malformed_bundle_is_a_hard_error() {
        let aliases = AliasResolver::default();
        let engine = Engine::new(&aliases, &ExactMatcher);
        let mut bundles = ContextBundles::default();
        bundles.roadmap.matches.push(RoadmapMatch {
            feature_id: String::new(),
            component_id: "PSYC-F04-C01".into(),
            component_name: "Nudge Timing".into(),
            status: None,
            owner: None,
            sprint: None,
        });
        let err = engine.check("Add nudge cooldown", &bundles).unwrap_err();
        assert!(matches!(err, AlignError::MalformedInput { .. }));
    }

    #[test]
    fn unselected_malformed_bundle_is_not_validated() {
        let aliases = AliasResolver::default();
        let engine = Engine::new(&aliases, &ExactMatcher)
            .with_selection(CheckSelection::of(&[SourceKind::Blueprint]));
        let mut bundles = ContextBundles::default();
        bundles.requirements.estimated_hours = Some(-3.0);
        assert!(engine.check("Add nudge cooldown", &bundles).is_ok());
    }
}
