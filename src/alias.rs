//! Alias resolution: maps surface-form names to canonical identifiers.
//!
//! Sources name the same thing differently ("FlashpointEvent" in a success
//! criterion, "Flashpoint Detector" in a diagram, `PLAT-F11-C02` in the
//! roadmap). The alias table folds those spellings into one [`CanonicalName`]
//! so every comparator and the coherence checker agree on identity.
//!
//! The table is loaded once per run and never mutated afterwards; the
//! resolver is passed by reference to everything that needs it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::ports::filesystem::FileSystem;

/// Stable identifier a surface-form name resolves to.
///
/// Two names with equal canonical forms refer to the same entity everywhere
/// in the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    /// Returns the canonical key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a name for lookup: lowercase, alphanumerics only.
///
/// Whitespace, `_`, `-` and any other punctuation are dropped, so
/// `"Flashpoint Detector"`, `"flashpoint_detector"` and `"FlashpointDetector"`
/// all normalize to `"flashpointdetector"`.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// On-disk alias mapping.
///
/// ```yaml
/// components:
///   flashpoint_detector: ["Flashpoint Detector", "FlashpointEvent", "FD"]
/// out_of_scope: ["assessment_import"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasTable {
    /// Canonical identifier -> surface forms that mean the same thing.
    #[serde(default)]
    pub components: BTreeMap<String, Vec<String>>,
    /// Names deliberately outside the current scope.
    #[serde(default)]
    pub out_of_scope: Vec<String>,
}

impl AliasTable {
    /// Parses an alias table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Yaml`] if the document does not match the table shape.
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|source| AlignError::Yaml { path: path.to_path_buf(), source })
    }

    /// Loads the alias table at `path`, or an empty table if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            tracing::info!(path = %path.display(), "no alias table, names resolve to themselves");
            return Ok(Self::default());
        }
        let text = fs
            .read_to_string(path)
            .map_err(|source| AlignError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml(path, &text)
    }
}

/// Read-only lookup from surface forms to canonical names.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    lookup: HashMap<String, CanonicalName>,
    out_of_scope: HashSet<CanonicalName>,
}

impl AliasResolver {
    /// Builds a resolver from an alias table.
    ///
    /// When a surface form is listed under two canonicals the first one (in
    /// table order) wins and the clash is logged.
    #[must_use]
    pub fn new(table: &AliasTable) -> Self {
        let mut lookup: HashMap<String, CanonicalName> = HashMap::new();

        for canonical in table.components.keys() {
            let key = normalize(canonical);
            lookup.entry(key.clone()).or_insert_with(|| CanonicalName(key));
        }

        for (canonical, aliases) in &table.components {
            let target = CanonicalName(normalize(canonical));
            for alias in aliases {
                let key = normalize(alias);
                if key.is_empty() {
                    continue;
                }
                match lookup.get(&key) {
                    Some(existing) if *existing != target => {
                        tracing::warn!(
                            alias = %alias,
                            kept = %existing,
                            ignored = %target,
                            "alias maps to more than one canonical name"
                        );
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(key, target.clone());
                    }
                }
            }
        }

        let mut resolver = Self { lookup, out_of_scope: HashSet::new() };
        resolver.out_of_scope =
            table.out_of_scope.iter().map(|name| resolver.resolve(name)).collect();
        resolver
    }

    /// Resolves a surface-form name to its canonical identifier.
    ///
    /// Unknown names resolve to their own normalized form. Never fails.
    #[must_use]
    pub fn resolve(&self, name: &str) -> CanonicalName {
        let key = normalize(name);
        self.lookup.get(&key).cloned().unwrap_or(CanonicalName(key))
    }

    /// Returns the canonical name only if `name` is listed in the alias table.
    #[must_use]
    pub fn known(&self, name: &str) -> Option<&CanonicalName> {
        self.lookup.get(&normalize(name))
    }

    /// Returns `true` if both names resolve to the same canonical identifier.
    #[must_use]
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.resolve(a) == self.resolve(b)
    }

    /// Returns `true` if the name is listed as out of scope.
    #[must_use]
    pub fn is_out_of_scope(&self, name: &str) -> bool {
        self.out_of_scope.contains(&self.resolve(name))
    }

    /// Number of known surface forms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` if the resolver has no alias entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
