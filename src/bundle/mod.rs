//! Context bundles: what each source of truth knows about a task.
//!
//! Bundles are produced by external fetchers and handed to the engine as YAML
//! files, one per source:
//!
//! ```text
//! <bundle_dir>/
//!   ├── blueprint.yaml
//!   ├── codebase.yaml
//!   ├── roadmap.yaml
//!   ├── requirements.yaml
//!   └── diagrams/*.mmd
//! ```
//!
//! A missing file means the source had nothing to say; it is never an error.

pub mod blueprint;
pub mod codebase;
pub mod mermaid;
pub mod requirements;
pub mod roadmap;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use blueprint::{BlueprintComponent, BlueprintContext, Diagram, FlowSpec};
pub use codebase::{CodeFile, CodebaseContext, Implementation};
pub use requirements::{RequirementFile, RequirementsContext, ScopeItem};
pub use roadmap::{Feature, RoadmapComponent, RoadmapContext, RoadmapMatch};

use crate::alias::{AliasResolver, CanonicalName};
use crate::error::{AlignError, Result};
use crate::extract::TaskFacts;
use crate::model::SourceKind;
use crate::ports::filesystem::FileSystem;

/// The four context bundles for one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextBundles {
    /// Architecture diagrams.
    #[serde(default)]
    pub blueprint: BlueprintContext,
    /// Implementation state.
    #[serde(default)]
    pub codebase: CodebaseContext,
    /// Planning state.
    #[serde(default)]
    pub roadmap: RoadmapContext,
    /// Acceptance and success criteria.
    #[serde(default)]
    pub requirements: RequirementsContext,
}

impl ContextBundles {
    /// Validates every bundle, stopping at the first structural violation.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::MalformedInput`] naming the offending bundle.
    pub fn validate(&self) -> Result<()> {
        self.blueprint.validate()?;
        self.codebase.validate()?;
        self.roadmap.validate()?;
        self.requirements.validate()
    }
}

/// Loads [`ContextBundles`] from a bundle directory through the `FileSystem` port.
pub struct BundleLoader<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
}

impl<'a> BundleLoader<'a> {
    /// Creates a loader reading from `root`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, root: &Path) -> Self {
        Self { fs, root: root.to_path_buf() }
    }

    /// Loads every bundle for the task described by `facts`.
    ///
    /// Mermaid diagrams under `diagrams/` are merged into the blueprint when
    /// they mention one of the task keywords or components. Roadmap matches
    /// are derived from roadmap components when the fetcher left them empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundle file exists but cannot be read or parsed.
    pub fn load(&self, facts: &TaskFacts, aliases: &AliasResolver) -> Result<ContextBundles> {
        let mut blueprint: BlueprintContext = self.load_yaml(SourceKind::Blueprint)?;
        blueprint.diagrams.extend(self.load_diagrams(facts, aliases)?);

        let mut roadmap: RoadmapContext = self.load_yaml(SourceKind::Roadmap)?;
        roadmap.derive_matches(facts, aliases);

        Ok(ContextBundles {
            blueprint,
            codebase: self.load_yaml(SourceKind::Codebase)?,
            roadmap,
            requirements: self.load_yaml(SourceKind::Requirements)?,
        })
    }

    fn load_yaml<T: DeserializeOwned + Default>(&self, kind: SourceKind) -> Result<T> {
        let path = self.root.join(format!("{}.yaml", kind.name().to_lowercase()));
        if !self.fs.exists(&path) {
            tracing::info!(bundle = %kind, path = %path.display(), "bundle absent");
            return Ok(T::default());
        }
        let text = self
            .fs
            .read_to_string(&path)
            .map_err(|source| AlignError::Io { path: path.clone(), source })?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_yaml::from_str(&text).map_err(|e| AlignError::malformed(kind.name(), e.to_string()))
    }

    fn load_diagrams(&self, facts: &TaskFacts, aliases: &AliasResolver) -> Result<Vec<Diagram>> {
        let dir = self.root.join("diagrams");
        let paths = self
            .fs
            .files_with_extension(&dir, "mmd")
            .map_err(|source| AlignError::Io { path: dir.clone(), source })?;

        let mut diagrams = Vec::new();
        for path in paths {
            let content = self
                .fs
                .read_to_string(&path)
                .map_err(|source| AlignError::Io { path: path.clone(), source })?;
            let name =
                path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let diagram = mermaid::parse_diagram(&name, &content);
            if is_relevant(&name, &content, &diagram, facts, aliases) {
                tracing::debug!(diagram = %name, "including related diagram");
                diagrams.push(diagram);
            }
        }
        Ok(diagrams)
    }
}

fn is_relevant(
    name: &str,
    content: &str,
    diagram: &Diagram,
    facts: &TaskFacts,
    aliases: &AliasResolver,
) -> bool {
    let haystack = format!("{} {}", name.to_lowercase(), content.to_lowercase());
    if facts.keywords.iter().any(|kw| haystack.contains(kw.as_str())) {
        return true;
    }
    let endpoints: Vec<CanonicalName> = facts
        .flows
        .iter()
        .flat_map(|f| [aliases.resolve(&f.from), aliases.resolve(&f.to)])
        .collect();
    let named = |n: &str| {
        let key = aliases.resolve(n);
        facts.mentions(&key) || endpoints.contains(&key)
    };
    diagram
        .components
        .iter()
        .any(|c| named(c.id.as_str()) || c.name.as_deref().is_some_and(|n| named(n)))
}
