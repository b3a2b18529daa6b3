//! Roadmap bundle: features, components, and the rows matched to the task.

use serde::{Deserialize, Serialize};

use crate::alias::{normalize, AliasResolver};
use crate::error::{AlignError, Result};
use crate::extract::TaskFacts;

/// A roadmap feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature identifier (e.g. `PLAT-F11`).
    pub id: String,
    /// Feature title.
    pub name: String,
    /// Planning status.
    #[serde(default)]
    pub status: Option<String>,
}

/// A roadmap component row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapComponent {
    /// Component identifier (e.g. `PLAT-F11-C02`).
    pub id: String,
    /// Component title.
    pub name: String,
    /// Owning feature.
    #[serde(default)]
    pub feature_id: Option<String>,
    /// What the roadmap says the component covers.
    #[serde(default)]
    pub boundary: Option<String>,
    /// Planning status.
    #[serde(default)]
    pub status: Option<String>,
    /// Sprint the component is scheduled in.
    #[serde(default)]
    pub sprint: Option<String>,
}

/// A roadmap row the fetcher judged relevant to the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapMatch {
    /// Feature identifier.
    pub feature_id: String,
    /// Component identifier.
    pub component_id: String,
    /// Component title.
    pub component_name: String,
    /// Planning status.
    #[serde(default)]
    pub status: Option<String>,
    /// Assigned owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// Sprint the row is scheduled in.
    #[serde(default)]
    pub sprint: Option<String>,
}

/// Everything the roadmap source knows about the task's area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapContext {
    /// Known features.
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Known components.
    #[serde(default)]
    pub components: Vec<RoadmapComponent>,
    /// Rows matched to the task.
    #[serde(default)]
    pub matches: Vec<RoadmapMatch>,
    /// Name of the active sprint.
    #[serde(default)]
    pub current_sprint: Option<String>,
    /// Item names scheduled in the active sprint.
    #[serde(default)]
    pub current_sprint_items: Vec<String>,
    /// Problems the fetcher hit while collecting roadmap data.
    #[serde(default)]
    pub fetch_errors: Vec<String>,
}

impl RoadmapContext {
    /// Returns `true` when the source had nothing relevant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.components.is_empty() && self.matches.is_empty()
    }

    /// Returns `true` if the task, or any of its matched rows, is in the active sprint.
    #[must_use]
    pub fn is_in_current_sprint(&self, task: &str, aliases: &AliasResolver) -> bool {
        let flagged = self.matches.iter().any(|m| {
            m.sprint.is_some() && m.sprint.as_deref() == self.current_sprint.as_deref()
        });
        if flagged {
            return true;
        }

        let task_key = normalize(task);
        self.current_sprint_items.iter().any(|item| {
            let item_key = normalize(item);
            (!item_key.is_empty() && task_key.contains(&item_key))
                || self.matches.iter().any(|m| {
                    aliases.equivalent(item, &m.component_id)
                        || aliases.equivalent(item, &m.component_name)
                })
        })
    }

    /// Fills `matches` from `components` when the fetcher did not precompute them.
    ///
    /// A component matches when it is one of the task's components, or when its
    /// name contains one of the task keywords.
    pub fn derive_matches(&mut self, facts: &TaskFacts, aliases: &AliasResolver) {
        if !self.matches.is_empty() {
            return;
        }
        self.matches = self
            .components
            .iter()
            .filter(|c| {
                facts.mentions(&aliases.resolve(&c.id))
                    || facts.mentions(&aliases.resolve(&c.name))
                    || {
                        let name = c.name.to_lowercase();
                        facts.keywords.iter().any(|kw| kw.len() > 3 && name.contains(kw.as_str()))
                    }
            })
            .filter_map(|c| {
                // `PLAT-F11-C02` belongs to `PLAT-F11` when no feature is recorded.
                let feature_id = c
                    .feature_id
                    .clone()
                    .or_else(|| c.id.rsplit_once('-').map(|(feature, _)| feature.to_string()))?;
                Some(RoadmapMatch {
                    feature_id,
                    component_id: c.id.clone(),
                    component_name: c.name.clone(),
                    status: c.status.clone(),
                    owner: None,
                    sprint: c.sprint.clone(),
                })
            })
            .collect();
    }

    /// Checks the structural contract of the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] for features or components
    /// without ids, and for matches without a feature id.
    pub fn validate(&self) -> Result<()> {
        if self.features.iter().any(|f| f.id.trim().is_empty()) {
            return Err(AlignError::malformed("Roadmap", "feature without an id"));
        }
        if self.components.iter().any(|c| c.id.trim().is_empty()) {
            return Err(AlignError::malformed("Roadmap", "component without an id"));
        }
        if self.matches.iter().any(|m| m.feature_id.trim().is_empty()) {
            return Err(AlignError::malformed("Roadmap", "match without feature id"));
        }
        Ok(())
    }
}
