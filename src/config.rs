//! Engine configuration.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a YAML file (`--config`, or `taskalign.yaml` in the working directory)
//! 3. `TASKALIGN_*` environment variables (a `.env` file is loaded first)
//! 4. command-line flags

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::engine::CheckSelection;
use crate::error::{AlignError, Result};
use crate::ports::filesystem::FileSystem;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "taskalign.yaml";

/// Which matcher the comparators use for fuzzy lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Canonicalized exact and substring matching.
    #[default]
    Exact,
    /// Exact matching widened by an LLM similarity scorer.
    Semantic,
}

/// Resolved settings for one `check` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory holding the bundle YAML files and `diagrams/`.
    pub bundle_dir: PathBuf,
    /// Alias table location.
    pub alias_file: PathBuf,
    /// Matcher used by the comparators.
    pub matcher: MatcherKind,
    /// Minimum similarity score for the semantic matcher.
    pub semantic_threshold: f32,
    /// Model used by the semantic scorer.
    pub model: String,
    /// Token limit for one scoring request.
    pub max_tokens: u32,
    /// Comma-separated checks to run, or `all`.
    pub checks: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bundle_dir: PathBuf::from(".taskalign/bundles"),
            alias_file: PathBuf::from(".taskalign/aliases.yaml"),
            matcher: MatcherKind::Exact,
            semantic_threshold: 0.75,
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 512,
            checks: "all".to_string(),
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--bundles`
    pub bundle_dir: Option<PathBuf>,
    /// `--aliases`
    pub alias_file: Option<PathBuf>,
    /// `--matcher`
    pub matcher: Option<MatcherKind>,
    /// `--threshold`
    pub semantic_threshold: Option<f32>,
    /// `--checks`
    pub checks: Option<String>,
}

impl EngineConfig {
    /// Reads the YAML layer.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used if present and the defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(fs: &dyn FileSystem, path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fs.exists(&default) {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs
            .read_to_string(&path)
            .map_err(|source| AlignError::Io { path: path.clone(), source })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(&text)
            .map_err(|source| AlignError::Yaml { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Applies `TASKALIGN_*` variables read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Config`] if a variable holds an unparseable value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("TASKALIGN_BUNDLE_DIR") {
            self.bundle_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("TASKALIGN_ALIAS_FILE") {
            self.alias_file = PathBuf::from(file);
        }
        if let Some(matcher) = lookup("TASKALIGN_MATCHER") {
            self.matcher = MatcherKind::from_str(&matcher, true).map_err(|_| {
                AlignError::Config(format!("TASKALIGN_MATCHER: unknown matcher '{matcher}'"))
            })?;
        }
        if let Some(threshold) = lookup("TASKALIGN_THRESHOLD") {
            self.semantic_threshold = threshold.trim().parse().map_err(|_| {
                AlignError::Config(format!("TASKALIGN_THRESHOLD: '{threshold}' is not a number"))
            })?;
        }
        if let Some(model) = lookup("TASKALIGN_MODEL") {
            self.model = model;
        }
        if let Some(tokens) = lookup("TASKALIGN_MAX_TOKENS") {
            self.max_tokens = tokens.trim().parse().map_err(|_| {
                AlignError::Config(format!("TASKALIGN_MAX_TOKENS: '{tokens}' is not a count"))
            })?;
        }
        if let Some(checks) = lookup("TASKALIGN_CHECKS") {
            self.checks = checks;
        }
        Ok(())
    }

    /// Applies command-line flags.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides { bundle_dir, alias_file, matcher, semantic_threshold, checks } =
            overrides;
        if let Some(dir) = bundle_dir {
            self.bundle_dir = dir;
        }
        if let Some(file) = alias_file {
            self.alias_file = file;
        }
        if let Some(matcher) = matcher {
            self.matcher = matcher;
        }
        if let Some(threshold) = semantic_threshold {
            self.semantic_threshold = threshold;
        }
        if let Some(checks) = checks {
            self.checks = checks;
        }
    }

    /// Resolves every layer against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any layer is unreadable or the result is invalid.
    pub fn resolve(
        fs: &dyn FileSystem,
        path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let mut config = Self::load(fs, path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// The parsed check list.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Config`] for an unknown or empty list.
    pub fn selection(&self) -> Result<CheckSelection> {
        self.checks.parse()
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(AlignError::Config(format!(
                "semantic_threshold must be between 0 and 1, got {}",
                self.semantic_threshold
            )));
        }
        if self.max_tokens == 0 {
            return Err(AlignError::Config("max_tokens must be positive".to_string()));
        }
        self.selection().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::SourceKind;
    use crate::testing::MemFs;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_a_file() {
        let config = EngineConfig::load(&MemFs::default(), None).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.matcher, MatcherKind::Exact);
        assert!((config.semantic_threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.selection().unwrap(), CheckSelection::all());
    }

    #[test]
    fn yaml_layer_fills_missing_fields_with_defaults() {
        let fs = MemFs::with(&[("conf.yaml", "matcher: semantic\nsemantic_threshold: 0.6\n")]);
        let config = EngineConfig::load(&fs, Some(Path::new("conf.yaml"))).unwrap();
        assert_eq!(config.matcher, MatcherKind::Semantic);
        assert!((config.semantic_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.bundle_dir, PathBuf::from(".taskalign/bundles"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = EngineConfig::load(&MemFs::default(), Some(Path::new("nope.yaml"))).unwrap_err();
        assert!(matches!(err, AlignError::Io { .. }));
    }

    #[test]
    fn unknown_yaml_keys_are_rejected() {
        let fs = MemFs::with(&[("conf.yaml", "matchr: exact\n")]);
        let err = EngineConfig::load(&fs, Some(Path::new("conf.yaml"))).unwrap_err();
        assert!(matches!(err, AlignError::Yaml { .. }));
    }

    #[test]
    fn env_then_flags_win() {
        let fs = MemFs::with(&[(DEFAULT_CONFIG_FILE, "checks: blueprint,roadmap\n")]);
        let mut config = EngineConfig::load(&fs, None).unwrap();
        config
            .apply_env(env(&[("TASKALIGN_MATCHER", "Semantic"), ("TASKALIGN_CHECKS", "roadmap")]))
            .unwrap();
        assert_eq!(config.matcher, MatcherKind::Semantic);
        assert_eq!(config.checks, "roadmap");

        config.apply_overrides(ConfigOverrides {
            matcher: Some(MatcherKind::Exact),
            bundle_dir: Some(PathBuf::from("ctx")),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.matcher, MatcherKind::Exact);
        assert_eq!(config.bundle_dir, PathBuf::from("ctx"));
        assert_eq!(config.selection().unwrap().sources(), &[SourceKind::Roadmap]);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let mut config = EngineConfig::default();
        let err = config.apply_env(env(&[("TASKALIGN_THRESHOLD", "high")])).unwrap_err();
        assert!(matches!(err, AlignError::Config(_)));
        let err = config.apply_env(env(&[("TASKALIGN_MATCHER", "fuzzy")])).unwrap_err();
        assert!(matches!(err, AlignError::Config(_)));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let config = EngineConfig { semantic_threshold: 1.5, ..EngineConfig::default() };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: semantic_threshold must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn unknown_check_is_rejected() {
        let config = EngineConfig { checks: "blueprint,astrology".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(AlignError::Config(_))));
    }
}
