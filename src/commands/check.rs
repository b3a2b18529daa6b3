//! `taskalign check`: run the engine for one task and emit the report.

use chrono::Utc;

use crate::adapters::live::LlmSimilarityScorer;
use crate::alias::{AliasResolver, AliasTable};
use crate::bundle::BundleLoader;
use crate::cli::CheckArgs;
use crate::config::{ConfigOverrides, EngineConfig, MatcherKind};
use crate::context::ServiceContext;
use crate::engine::Engine;
use crate::error::{AlignError, Result};
use crate::matcher::{ExactMatcher, Matcher, SemanticMatcher};
use crate::model::Status;
use crate::render::{to_json, to_markdown};

/// Process exit status for a verdict.
#[must_use]
pub fn exit_code(status: Status) -> u8 {
    match status {
        Status::Aligned => 0,
        Status::Conflicts => 1,
        Status::MissingInfo => 2,
    }
}

/// Runs the check command.
///
/// # Errors
///
/// Returns an error string for configuration, I/O or malformed-bundle failures.
pub fn run(ctx: &ServiceContext, args: &CheckArgs) -> std::result::Result<u8, String> {
    let overrides = ConfigOverrides {
        bundle_dir: args.bundles.clone(),
        alias_file: args.aliases.clone(),
        matcher: args.matcher,
        semantic_threshold: args.threshold,
        checks: args.checks.clone(),
    };
    let config = EngineConfig::resolve(ctx.fs.as_ref(), args.config.as_deref(), overrides)
        .map_err(|e| e.to_string())?;
    let (rendered, status) = execute(ctx, &config, args).map_err(|e| e.to_string())?;

    match &args.output {
        Some(path) => {
            ctx.fs
                .write(path, &rendered)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(exit_code(status))
}

/// Loads inputs per `config`, checks the task and renders the report.
fn execute(
    ctx: &ServiceContext,
    config: &EngineConfig,
    args: &CheckArgs,
) -> Result<(String, Status)> {
    let table = AliasTable::load(ctx.fs.as_ref(), &config.alias_file)?;
    let aliases = AliasResolver::new(&table);
    if aliases.is_empty() {
        tracing::debug!("alias table is empty, names resolve to themselves");
    } else {
        tracing::debug!(surface_forms = aliases.len(), "alias table loaded");
    }
    let matcher = build_matcher(ctx, config)?;
    let engine = Engine::new(&aliases, matcher.as_ref()).with_selection(config.selection()?);

    let facts = engine.facts(&args.task);
    let bundles = BundleLoader::new(ctx.fs.as_ref(), &config.bundle_dir).load(&facts, &aliases)?;
    let report = engine.check_facts(&facts, &bundles)?;

    let now = Utc::now();
    let rendered = if args.json { to_json(&report, now)? } else { to_markdown(&report, now) };
    Ok((rendered, report.overall_status()))
}

fn build_matcher(ctx: &ServiceContext, config: &EngineConfig) -> Result<Box<dyn Matcher>> {
    match config.matcher {
        MatcherKind::Exact => Ok(Box::new(ExactMatcher)),
        MatcherKind::Semantic => {
            let scorer =
                LlmSimilarityScorer::new(ctx.llm.clone(), config.model.clone(), config.max_tokens)
                    .map_err(|e| AlignError::Port(e.to_string()))?;
            Ok(Box::new(SemanticMatcher::new(Box::new(scorer), config.semantic_threshold)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
    use crate::ports::PortError;
    use crate::testing::MemFs;

    struct OfflineLlm;

    impl LlmClient for OfflineLlm {
        fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
            let reply: std::result::Result<CompletionResponse, PortError> = Err("offline".into());
            Box::pin(async move { reply })
        }
    }

    fn context(files: &[(&str, &str)]) -> ServiceContext {
        ServiceContext { fs: Box::new(MemFs::with(files)), llm: Arc::new(OfflineLlm) }
    }

    fn args(task: &str, json: bool) -> CheckArgs {
        CheckArgs {
            task: task.to_string(),
            bundles: None,
            aliases: None,
            config: None,
            checks: None,
            matcher: None,
            threshold: None,
            json,
            output: None,
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            bundle_dir: PathBuf::from("ctx"),
            alias_file: PathBuf::from("ctx/aliases.yaml"),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn exit_codes_follow_verdict() {
        assert_eq!(exit_code(Status::Aligned), 0);
        assert_eq!(exit_code(Status::Conflicts), 1);
        assert_eq!(exit_code(Status::MissingInfo), 2);
    }

    #[test]
    fn empty_bundles_report_missing_info() {
        let ctx = context(&[]);
        let (rendered, status) =
            execute(&ctx, &config(), &args("Add nudge cooldown", false)).unwrap();
        assert_eq!(status, Status::MissingInfo);
        assert!(rendered.contains("# Alignment Report: Add nudge cooldown"));
        assert!(rendered.contains("Task not found in roadmap — needs to be added"));
    }

    #[test]
    fn malformed_bundle_fails_the_run() {
        let ctx = context(&[("ctx/requirements.yaml", "estimated_hours: -2\n")]);
        let err = execute(&ctx, &config(), &args("Add nudge cooldown", true)).unwrap_err();
        assert!(matches!(err, AlignError::MalformedInput { .. }));
    }

    #[test]
    fn semantic_matcher_degrades_when_offline() {
        let ctx = context(&[(
            "ctx/blueprint.yaml",
            "diagrams:\n  - name: fusion.mmd\n    components:\n      - id: FD\n        \
             name: Flashpoint Detector\n",
        )]);
        let config = EngineConfig {
            matcher: MatcherKind::Semantic,
            checks: "blueprint".into(),
            ..config()
        };
        let (rendered, status) = execute(&ctx, &config, &args("Add AlertRouter", true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(status, Status::MissingInfo);
        assert_eq!(
            value["checks"][0]["missing"][0]["detail"],
            "Component 'AlertRouter' not in architecture"
        );
        assert!(value["checks"][0]["conflicts"].as_array().unwrap().is_empty());
    }
}
