//! Blueprint bundle: architecture diagrams, their components and data flows.

use serde::{Deserialize, Serialize};

use crate::alias::{AliasResolver, CanonicalName};
use crate::error::{AlignError, Result};

/// A component node declared in a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintComponent {
    /// Node identifier (e.g. `FD`).
    pub id: String,
    /// Human label (e.g. "Flashpoint Detector").
    #[serde(default)]
    pub name: Option<String>,
    /// What the component is responsible for.
    #[serde(default)]
    pub boundary: Option<String>,
    /// Lifecycle status, if the diagram records one.
    #[serde(default)]
    pub status: Option<String>,
}

/// A directed data-flow edge between two components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSpec {
    /// Producing component.
    pub from: String,
    /// Consuming component.
    pub to: String,
}

/// One architecture diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    /// File name of the diagram.
    pub name: String,
    /// Components declared in it.
    #[serde(default)]
    pub components: Vec<BlueprintComponent>,
    /// Data flows it validates.
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

/// Everything the blueprint source knows about the task's area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintContext {
    /// Relevant diagrams.
    #[serde(default)]
    pub diagrams: Vec<Diagram>,
}

impl BlueprintContext {
    /// Returns `true` when the source had nothing relevant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    /// Iterates over every component with the diagram that declares it.
    pub fn components(&self) -> impl Iterator<Item = (&BlueprintComponent, &Diagram)> {
        self.diagrams.iter().flat_map(|d| d.components.iter().map(move |c| (c, d)))
    }

    /// Iterates over every flow with the diagram that declares it.
    pub fn flows(&self) -> impl Iterator<Item = (&FlowSpec, &Diagram)> {
        self.diagrams.iter().flat_map(|d| d.flows.iter().map(move |f| (f, d)))
    }

    /// Finds the component a canonical name refers to, by id or label.
    #[must_use]
    pub fn find_component(
        &self,
        canonical: &CanonicalName,
        aliases: &AliasResolver,
    ) -> Option<(&BlueprintComponent, &Diagram)> {
        self.components().find(|(c, _)| {
            aliases.resolve(&c.id) == *canonical
                || c.name.as_deref().is_some_and(|n| aliases.resolve(n) == *canonical)
        })
    }

    /// The diagram that validates the flow `from -> to`, if any.
    ///
    /// Endpoints on both sides are mapped to the component they name, by id
    /// or label, so a flow drawn between labels matches a task naming ids.
    #[must_use]
    pub fn find_flow(
        &self,
        from: &CanonicalName,
        to: &CanonicalName,
        aliases: &AliasResolver,
    ) -> Option<&Diagram> {
        let from = self.endpoint(from, aliases);
        let to = self.endpoint(to, aliases);
        self.flows()
            .find(|(f, _)| {
                self.endpoint(&aliases.resolve(&f.from), aliases) == from
                    && self.endpoint(&aliases.resolve(&f.to), aliases) == to
            })
            .map(|(_, d)| d)
    }

    /// Identity of a flow endpoint: the declaring component's id, or the
    /// canonical name itself when no component claims it.
    fn endpoint(&self, canonical: &CanonicalName, aliases: &AliasResolver) -> CanonicalName {
        self.find_component(canonical, aliases)
            .map_or_else(|| canonical.clone(), |(c, _)| aliases.resolve(&c.id))
    }

    /// Returns `true` if the diagrams declare a component with this identity.
    #[must_use]
    pub fn has_component(&self, canonical: &CanonicalName, aliases: &AliasResolver) -> bool {
        self.find_component(canonical, aliases).is_some()
    }

    /// Checks the structural contract of the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] for unnamed diagrams, components
    /// without ids, or flows with an empty endpoint.
    pub fn validate(&self) -> Result<()> {
        for diagram in &self.diagrams {
            if diagram.name.trim().is_empty() {
                return Err(AlignError::malformed("Blueprint", "diagram without a name"));
            }
            if let Some(c) = diagram.components.iter().find(|c| c.id.trim().is_empty()) {
                return Err(AlignError::malformed(
                    "Blueprint",
                    format!(
                        "component without an id in {} (label {:?})",
                        diagram.name,
                        c.name.as_deref().unwrap_or("")
                    ),
                ));
            }
            if diagram.flows.iter().any(|f| f.from.trim().is_empty() || f.to.trim().is_empty()) {
                return Err(AlignError::malformed(
                    "Blueprint",
                    format!("flow with an empty endpoint in {}", diagram.name),
                ));
            }
        }
        Ok(())
    }
}
