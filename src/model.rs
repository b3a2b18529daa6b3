//! Findings, per-source check results, and the alignment report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alias::CanonicalName;

/// Verdict severity. Ordered so that the maximum is the overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Consistent with the source(s).
    Aligned,
    /// Some source has no information, or lacks something the task needs.
    MissingInfo,
    /// Some source contradicts the task or another source.
    Conflicts,
}

impl Status {
    /// Upper-case label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Aligned => "ALIGNED",
            Self::MissingInfo => "MISSING_INFO",
            Self::Conflicts => "CONFLICTS",
        }
    }

    /// Short marker used in Markdown output.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Aligned => "✓",
            Self::MissingInfo => "?",
            Self::Conflicts => "⚠",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which check produced a result. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Architecture blueprint diagrams.
    Blueprint,
    /// The implemented codebase.
    Codebase,
    /// Roadmap and sprint planning.
    Roadmap,
    /// Business requirements and acceptance criteria.
    Requirements,
    /// Agreement between the four sources themselves.
    #[serde(rename = "Cross-Source Coherence")]
    Coherence,
}

impl SourceKind {
    /// The four sources of truth, in report order.
    pub const SOURCES: [Self; 4] =
        [Self::Blueprint, Self::Codebase, Self::Roadmap, Self::Requirements];

    /// Display name used in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blueprint => "Blueprint",
            Self::Codebase => "Codebase",
            Self::Roadmap => "Roadmap",
            Self::Requirements => "Requirements",
            Self::Coherence => "Cross-Source Coherence",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The source confirms something about the task.
    Match,
    /// The source contradicts the task, or two sources contradict each other.
    Conflict,
    /// The source lacks something; a gap, not a contradiction.
    Missing,
    /// Informational; never changes the verdict.
    Warning,
}

/// Where a finding's supporting fact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// A blueprint diagram.
    Diagram {
        /// Diagram file name.
        name: String,
    },
    /// A file in the codebase.
    File {
        /// Path relative to the repository root.
        path: String,
    },
    /// A roadmap row.
    Roadmap {
        /// Feature identifier.
        feature_id: String,
        /// Component identifier.
        component_id: String,
    },
    /// A requirements document or criterion.
    Requirement {
        /// Document or scope item name.
        name: String,
    },
    /// Two sources asserting different values for the same attribute.
    Disagreement {
        /// Attribute in dispute (`name`, `boundary`, `status`).
        attribute: String,
        /// First source and the value it asserts.
        left: (SourceKind, String),
        /// Second source and the value it asserts.
        right: (SourceKind, String),
    },
}

/// One atomic observation produced by a comparator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// What kind of observation this is.
    pub kind: FindingKind,
    /// The entity the finding is about, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<CanonicalName>,
    /// Human-readable description.
    pub detail: String,
    /// Supporting reference, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl Finding {
    /// Creates a finding with no subject or evidence.
    pub fn new(kind: FindingKind, detail: impl Into<String>) -> Self {
        Self { kind, subject: None, detail: detail.into(), evidence: None }
    }

    /// Attaches the entity this finding is about.
    #[must_use]
    pub fn about(mut self, subject: CanonicalName) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Attaches a supporting reference.
    #[must_use]
    pub fn citing(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// Outcome of checking the task against one source (or of the coherence check).
///
/// Built once by its comparator; the status is derived from the findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check produced this result.
    pub source: SourceKind,
    /// Confirmations.
    pub matches: Vec<Finding>,
    /// Contradictions.
    pub conflicts: Vec<Finding>,
    /// Gaps.
    pub missing: Vec<Finding>,
    /// Informational notes.
    pub warnings: Vec<Finding>,
}

impl CheckResult {
    /// Creates an empty result for `source`.
    #[must_use]
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            matches: Vec::new(),
            conflicts: Vec::new(),
            missing: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Files a finding under the list matching its kind.
    pub fn push(&mut self, finding: Finding) {
        match finding.kind {
            FindingKind::Match => self.matches.push(finding),
            FindingKind::Conflict => self.conflicts.push(finding),
            FindingKind::Missing => self.missing.push(finding),
            FindingKind::Warning => self.warnings.push(finding),
        }
    }

    /// Records a match.
    pub fn add_match(&mut self, detail: impl Into<String>) {
        self.matches.push(Finding::new(FindingKind::Match, detail));
    }

    /// Records a conflict.
    pub fn add_conflict(&mut self, detail: impl Into<String>) {
        self.conflicts.push(Finding::new(FindingKind::Conflict, detail));
    }

    /// Records a gap.
    pub fn add_missing(&mut self, detail: impl Into<String>) {
        self.missing.push(Finding::new(FindingKind::Missing, detail));
    }

    /// Records a warning.
    pub fn add_warning(&mut self, detail: impl Into<String>) {
        self.warnings.push(Finding::new(FindingKind::Warning, detail));
    }

    /// Derived status: any conflict, else any gap, else aligned.
    #[must_use]
    pub fn status(&self) -> Status {
        if !self.conflicts.is_empty() {
            Status::Conflicts
        } else if !self.missing.is_empty() {
            Status::MissingInfo
        } else {
            Status::Aligned
        }
    }

    /// All findings in list order: matches, conflicts, missing, warnings.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.matches.iter().chain(&self.conflicts).chain(&self.missing).chain(&self.warnings)
    }
}

/// The engine's output: the task, every check, and the overall verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    task: String,
    checks: Vec<CheckResult>,
    overall_status: Status,
}

impl AlignmentReport {
    /// Assembles a report. Checks are sorted into report order and the overall
    /// status is computed once here.
    #[must_use]
    pub fn new(task: impl Into<String>, mut checks: Vec<CheckResult>) -> Self {
        checks.sort_by_key(|c| c.source);
        let overall_status = compute_overall_status(&checks);
        Self { task: task.into(), checks, overall_status }
    }

    /// The task description that was checked.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Per-source results in report order.
    #[must_use]
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// The result for one source, if that check ran.
    #[must_use]
    pub fn check(&self, source: SourceKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.source == source)
    }

    /// The verdict computed when the report was built.
    #[must_use]
    pub fn overall_status(&self) -> Status {
        self.overall_status
    }

    /// Recomputes the verdict from the checks. Always equals [`Self::overall_status`].
    #[must_use]
    pub fn compute_overall_status(&self) -> Status {
        compute_overall_status(&self.checks)
    }
}

/// Maximum severity across all checks; `Aligned` when there are none.
#[must_use]
pub fn compute_overall_status(checks: &[CheckResult]) -> Status {
    checks.iter().map(CheckResult::status).max().unwrap_or(Status::Aligned)
}
