//! Codebase bundle: relevant files, existing implementations, installed dependencies.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// A source file judged relevant to the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Language tag (`python`, `typescript`, `rust`, ...).
    #[serde(default)]
    pub language: Option<String>,
    /// Functions, classes and other top-level symbols defined in the file.
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Something already implemented that may overlap with the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Symbol or feature name.
    pub name: String,
    /// Where it lives.
    #[serde(default)]
    pub location: Option<String>,
}

/// Everything the codebase source knows about the task's area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebaseContext {
    /// Relevant files.
    #[serde(default)]
    pub files: Vec<CodeFile>,
    /// Existing implementations that may overlap the task.
    #[serde(default)]
    pub existing_implementations: Vec<Implementation>,
    /// Dependencies available to the project.
    #[serde(default)]
    pub available_dependencies: Vec<String>,
}

impl CodebaseContext {
    /// Returns `true` when the source had nothing relevant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.existing_implementations.is_empty()
            && self.available_dependencies.is_empty()
    }

    /// Every symbol named by a file or an implementation.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .flat_map(|f| f.symbols.iter().map(String::as_str))
            .chain(self.existing_implementations.iter().map(|i| i.name.as_str()))
    }

    /// Checks the structural contract of the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] for files without a path or
    /// implementations without a name.
    pub fn validate(&self) -> Result<()> {
        if self.files.iter().any(|f| f.path.trim().is_empty()) {
            return Err(AlignError::malformed("Codebase", "file without a path"));
        }
        if self.existing_implementations.iter().any(|i| i.name.trim().is_empty()) {
            return Err(AlignError::malformed("Codebase", "implementation without a name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_cover_files_and_implementations() {
        let ctx = CodebaseContext {
            files: vec![CodeFile {
                path: "src/tone.py".into(),
                language: Some("python".into()),
                symbols: vec!["detect_tone_shift".into()],
            }],
            existing_implementations: vec![Implementation {
                name: "ToneShiftDetector".into(),
                location: None,
            }],
            available_dependencies: vec![],
        };
        let symbols: Vec<&str> = ctx.symbols().collect();
        assert_eq!(symbols, vec!["detect_tone_shift", "ToneShiftDetector"]);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn rejects_unnamed_implementation() {
        let ctx = CodebaseContext {
            existing_implementations: vec![Implementation { name: String::new(), location: None }],
            ..CodebaseContext::default()
        };
        assert!(ctx.validate().is_err());
    }
}
