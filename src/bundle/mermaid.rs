//! Mermaid flowchart import for blueprint diagrams.

use std::sync::LazyLock;

use regex::Regex;

use super::blueprint::{BlueprintComponent, Diagram, FlowSpec};

static NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b([A-Za-z_][A-Za-z0-9_]*)\s*(?:\[\[?|\(\(?|\{)",
        r#"\s*"?([^\]\)\}"]*)"?\s*(?:\]\]?|\)\)?|\})"#,
    ))
    .expect("Invalid regex pattern for mermaid nodes")
});

static SUBGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*subgraph\s+(?:",
        r#"([A-Za-z_][A-Za-z0-9_]*)\s*\[\s*"?([^"\]]+)"?\s*\]"#,
        r#"|"([^"]+)"|(.+))$"#,
    ))
    .expect("Invalid regex pattern for mermaid subgraphs")
});

static EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:-\.->|==>|-->>|-->|->>|->|---)\s*(?:\|[^|]*\|\s*)?")
        .expect("Invalid regex pattern for mermaid edges")
});

static IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("Invalid regex pattern for mermaid ids")
});

const SKIPPED: &[&str] =
    &["graph", "flowchart", "end", "classDef", "class", "style", "click", "linkStyle"];

/// Parses a Mermaid flowchart into a [`Diagram`].
///
/// Declared nodes and subgraph titles become components; every edge becomes a
/// flow between the node ids it connects. Unsupported statements are skipped.
#[must_use]
pub fn parse_diagram(name: &str, content: &str) -> Diagram {
    let mut diagram = Diagram { name: name.to_string(), ..Diagram::default() };

    for raw in content.lines() {
        let line = raw.trim().trim_end_matches(';');
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        let head = line.split_whitespace().next().unwrap_or_default();
        if SKIPPED.contains(&head) {
            continue;
        }

        if let Some(caps) = SUBGRAPH.captures(line) {
            let (id, label) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
                (Some(id), Some(label), _, _) => (id.as_str().to_string(), label.as_str()),
                (_, _, Some(title), _) | (_, _, _, Some(title)) => {
                    (title.as_str().trim().replace(' ', "_"), title.as_str())
                }
                _ => continue,
            };
            add_component(&mut diagram, &id, Some(label.trim()));
            continue;
        }

        for caps in NODE.captures_iter(line) {
            let (Some(id), Some(label)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let label = label.as_str().trim();
            add_component(&mut diagram, id.as_str(), (!label.is_empty()).then_some(label));
        }

        let stripped = NODE.replace_all(line, "$1");
        let ends: Vec<&str> = EDGE
            .split(&stripped)
            .filter_map(|part| IDENT.find(part.trim()).map(|m| m.as_str()))
            .collect();
        if ends.len() < 2 {
            continue;
        }
        for pair in ends.windows(2) {
            add_component(&mut diagram, pair[0], None);
            add_component(&mut diagram, pair[1], None);
            let flow = FlowSpec { from: pair[0].to_string(), to: pair[1].to_string() };
            if !diagram.flows.contains(&flow) {
                diagram.flows.push(flow);
            }
        }
    }
    diagram
}

fn add_component(diagram: &mut Diagram, id: &str, label: Option<&str>) {
    match diagram.components.iter_mut().find(|c| c.id == id) {
        Some(existing) => {
            if existing.name.is_none() {
                existing.name = label.map(String::from);
            }
        }
        None => diagram.components.push(BlueprintComponent {
            id: id.to_string(),
            name: label.map(String::from),
            boundary: None,
            status: None,
        }),
    }
}
