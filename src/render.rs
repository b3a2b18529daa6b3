//! Markdown and JSON renderings of an [`AlignmentReport`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::model::{AlignmentReport, CheckResult, Finding, SourceKind, Status};

/// Renders `report` as a Markdown document.
#[must_use]
pub fn to_markdown(report: &AlignmentReport, generated_at: DateTime<Utc>) -> String {
    Markdown { report, generated_at }.to_string()
}

/// Renders `report` as pretty-printed JSON, including each check's derived status.
///
/// # Errors
///
/// Returns [`crate::error::AlignError::Json`] if serialization fails.
pub fn to_json(report: &AlignmentReport, generated_at: DateTime<Utc>) -> Result<String> {
    let view = ReportView {
        task: report.task(),
        overall_status: report.overall_status(),
        generated_at: generated_at.to_rfc3339(),
        checks: report.checks().iter().map(CheckView::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

struct Markdown<'a> {
    report: &'a AlignmentReport,
    generated_at: DateTime<Utc>,
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.report.overall_status();
        writeln!(f, "# Alignment Report: {}", self.report.task())?;
        writeln!(f)?;
        writeln!(f, "**Overall Status:** {} {status}", status.marker())?;
        writeln!(f)?;
        writeln!(f, "*Generated: {}*", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;

        for check in self.report.checks() {
            let status = check.status();
            writeln!(f)?;
            writeln!(f, "## {}", check.source)?;
            writeln!(f, "**Status:** {} {status}", status.marker())?;
            section(f, "Matches", "", &check.matches)?;
            section(f, "Conflicts", "✗ ", &check.conflicts)?;
            section(f, "Missing", "? ", &check.missing)?;
            section(f, "Warnings", "⚠ ", &check.warnings)?;
        }
        Ok(())
    }
}

fn section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    bullet: &str,
    items: &[Finding],
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "**{title}:**")?;
    for item in items {
        writeln!(f, "- {bullet}{}", item.detail)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportView<'a> {
    task: &'a str,
    overall_status: Status,
    generated_at: String,
    checks: Vec<CheckView<'a>>,
}

#[derive(Serialize)]
struct CheckView<'a> {
    source: SourceKind,
    status: Status,
    matches: &'a [Finding],
    conflicts: &'a [Finding],
    missing: &'a [Finding],
    warnings: &'a [Finding],
}

impl<'a> From<&'a CheckResult> for CheckView<'a> {
    fn from(check: &'a CheckResult) -> Self {
        Self {
            source: check.source,
            status: check.status(),
            matches: &check.matches,
            conflicts: &check.conflicts,
            missing: &check.missing,
            warnings: &check.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> AlignmentReport {
        let mut blueprint = CheckResult::new(SourceKind::Blueprint);
        blueprint.add_match("Component 'Flashpoint Detector' found in fusion.mmd");
        let mut roadmap = CheckResult::new(SourceKind::Roadmap);
        roadmap.add_missing("Task not found in roadmap — needs to be added");
        roadmap.add_warning("Roadmap fetch error: timeout");
        AlignmentReport::new("Add Flashpoint Detector", vec![roadmap, blueprint])
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn markdown_has_header_and_sections() {
        let md = to_markdown(&sample(), at());
        assert!(md.starts_with("# Alignment Report: Add Flashpoint Detector\n"));
        assert!(md.contains("**Overall Status:** ? MISSING_INFO"));
        assert!(md.contains("*Generated: 2024-05-01 09:30:00*"));
        assert!(md.contains("## Blueprint\n**Status:** ✓ ALIGNED"));
        assert!(md.contains("**Missing:**\n- ? Task not found in roadmap"));
        assert!(md.contains("**Warnings:**\n- ⚠ Roadmap fetch error: timeout"));
        assert!(!md.contains("**Conflicts:**"));
        assert!(md.find("## Blueprint").unwrap() < md.find("## Roadmap").unwrap());
    }

    #[test]
    fn json_carries_derived_statuses() {
        let json = to_json(&sample(), at()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overall_status"], "MISSING_INFO");
        assert_eq!(value["generated_at"], "2024-05-01T09:30:00+00:00");
        assert_eq!(value["checks"][0]["source"], "Blueprint");
        assert_eq!(value["checks"][0]["status"], "ALIGNED");
        assert_eq!(value["checks"][1]["status"], "MISSING_INFO");
        assert_eq!(value["checks"][1]["missing"][0]["kind"], "missing");
    }
}
