//! Task vs. architecture diagrams.
//!
//! Components the diagrams do not know are gaps. The only contradiction is a
//! flow between two known components that the diagrams do not draw, and only
//! when the diagrams draw flows at all. That decision uses canonical identity
//! alone, never the fuzzy matcher, so the verdict cannot flip between runs.

use std::collections::BTreeSet;

use crate::bundle::BlueprintContext;
use crate::model::{CheckResult, Evidence, Finding, FindingKind, SourceKind};

use super::Comparison;

/// Compares the task against the blueprint bundle.
#[must_use]
pub fn compare_blueprint(cx: &Comparison<'_>, blueprint: &BlueprintContext) -> CheckResult {
    let mut result = CheckResult::new(SourceKind::Blueprint);
    if blueprint.is_empty() {
        result.add_missing("No relevant architecture diagrams found");
        return result;
    }

    let labelled: Vec<_> = blueprint.components().collect();
    let labels: Vec<&str> =
        labelled.iter().map(|(c, _)| c.name.as_deref().unwrap_or(c.id.as_str())).collect();
    let mut cited: BTreeSet<&str> = BTreeSet::new();

    for component in &cx.facts.components {
        let subject = component.canonical.clone();
        if let Some((_, diagram)) = blueprint.find_component(&subject, cx.aliases) {
            cited.insert(diagram.name.as_str());
            result.push(
                Finding::new(
                    FindingKind::Match,
                    format!("Component '{}' found in {}", component.surface, diagram.name),
                )
                .about(subject)
                .citing(Evidence::Diagram { name: diagram.name.clone() }),
            );
        } else if cx.aliases.is_out_of_scope(&component.surface) {
            result.push(
                Finding::new(
                    FindingKind::Match,
                    format!(
                        "Component '{}' is out of scope, no architecture needed",
                        component.surface
                    ),
                )
                .about(subject),
            );
        } else if let Some(best) =
            cx.matcher.find(cx.aliases, &component.surface, &labels).first()
        {
            let (_, diagram) = labelled[best.index];
            cited.insert(diagram.name.as_str());
            result.push(
                Finding::new(
                    FindingKind::Match,
                    format!(
                        "Component '{}' relates to '{}' in {}",
                        component.surface, labels[best.index], diagram.name
                    ),
                )
                .about(subject)
                .citing(Evidence::Diagram { name: diagram.name.clone() }),
            );
        } else {
            result.push(
                Finding::new(
                    FindingKind::Missing,
                    format!("Component '{}' not in architecture", component.surface),
                )
                .about(subject),
            );
        }
    }

    let draws_flows = blueprint.flows().next().is_some();
    for flow in &cx.facts.flows {
        let from = cx.aliases.resolve(&flow.from);
        let to = cx.aliases.resolve(&flow.to);
        if let Some(diagram) = blueprint.find_flow(&from, &to, cx.aliases) {
            cited.insert(diagram.name.as_str());
            result.push(
                Finding::new(
                    FindingKind::Match,
                    format!("Data flow '{flow}' supported by architecture"),
                )
                .citing(Evidence::Diagram { name: diagram.name.clone() }),
            );
        } else if draws_flows
            && blueprint.has_component(&from, cx.aliases)
            && blueprint.has_component(&to, cx.aliases)
        {
            result.push(Finding::new(
                FindingKind::Conflict,
                format!("Data flow '{flow}' not supported by architecture"),
            ));
        } else {
            result.add_missing(format!("Data flow '{flow}' not documented in architecture"));
        }
    }

    // Keywords already covered by a named component add nothing.
    let named: Vec<String> =
        cx.facts.components.iter().map(|c| c.surface.to_lowercase()).collect();
    for keyword in &cx.facts.keywords {
        if named.iter().any(|n| n.contains(keyword.as_str())) {
            continue;
        }
        let hit = labels.iter().position(|label| label.to_lowercase().contains(keyword.as_str()));
        if let Some(index) = hit {
            let (_, diagram) = labelled[index];
            cited.insert(diagram.name.as_str());
            result.push(
                Finding::new(
                    FindingKind::Match,
                    format!("Keyword '{keyword}' relates to architecture"),
                )
                .citing(Evidence::Diagram { name: diagram.name.clone() }),
            );
        }
    }

    for diagram in &blueprint.diagrams {
        if !cited.contains(diagram.name.as_str()) {
            result.push(
                Finding::new(FindingKind::Match, format!("Related diagram: {}", diagram.name))
                    .citing(Evidence::Diagram { name: diagram.name.clone() }),
            );
        }
    }

    result
}
