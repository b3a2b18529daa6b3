//! Requirements bundle: acceptance and success criteria, scope items, estimates.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// A requirement document relevant to the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementFile {
    /// File name.
    pub name: String,
    /// Relevant excerpt.
    #[serde(default)]
    pub content: String,
}

/// A scoped unit of work from the planning documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeItem {
    /// Display name.
    pub name: String,
    /// Identifier shared with the roadmap, when there is one.
    #[serde(default)]
    pub id: Option<String>,
    /// Acceptance criterion for this item.
    #[serde(default)]
    pub acceptance_criterion: Option<String>,
    /// What the item covers.
    #[serde(default)]
    pub boundary: Option<String>,
    /// Planning status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Everything the requirements source knows about the task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsContext {
    /// Acceptance criteria for the task as a whole.
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
    /// Success criteria for the task as a whole.
    #[serde(default)]
    pub success_criteria: Option<String>,
    /// Supporting requirement documents.
    #[serde(default)]
    pub requirement_files: Vec<RequirementFile>,
    /// Scope items.
    #[serde(default)]
    pub scope: Vec<ScopeItem>,
    /// Estimated effort in hours.
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Estimated size in lines of code.
    #[serde(default)]
    pub estimated_loc: Option<u32>,
}

/// Returns the text if it holds anything besides whitespace.
pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

impl RequirementsContext {
    /// Returns `true` when the source had nothing relevant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acceptance_criteria.is_none()
            && self.success_criteria.is_none()
            && self.requirement_files.is_empty()
            && self.scope.is_empty()
    }

    /// Task-level acceptance criteria, if present and non-blank.
    #[must_use]
    pub fn acceptance(&self) -> Option<&str> {
        non_blank(self.acceptance_criteria.as_deref())
    }

    /// Task-level success criteria, if present and non-blank.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        non_blank(self.success_criteria.as_deref())
    }

    /// Checks the structural contract of the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] for unnamed scope items or
    /// files, or a negative effort estimate.
    pub fn validate(&self) -> Result<()> {
        if self.scope.iter().any(|s| s.name.trim().is_empty()) {
            return Err(AlignError::malformed("Requirements", "scope item without a name"));
        }
        if self.requirement_files.iter().any(|f| f.name.trim().is_empty()) {
            return Err(AlignError::malformed("Requirements", "requirement file without a name"));
        }
        if self.estimated_hours.is_some_and(|h| !h.is_finite() || h < 0.0) {
            return Err(AlignError::malformed("Requirements", "estimated_hours must be >= 0"));
        }
        Ok(())
    }
}
