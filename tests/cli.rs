//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_taskalign(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_taskalign");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TASKALIGN_CHECKS")
        .env_remove("TASKALIGN_MATCHER")
        .env_remove("TASKALIGN_BUNDLE_DIR")
        .env_remove("TASKALIGN_ALIAS_FILE")
        .output()
        .expect("failed to run taskalign binary")
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

const ALIASES: &str = "components:\n  flashpoint_detector: [FD, Flashpoint Detector]\n";

const BLUEPRINT: &str = "\
diagrams:
  - name: fusion.mmd
    components:
      - { id: FD, name: Flashpoint Detector, boundary: ingestion+storage }
      - { id: TL, name: Timeline }
    flows:
      - { from: FD, to: TL }
";

#[test]
fn empty_workspace_exits_with_missing_info() {
    let dir = workspace(&[]);
    let output = run_taskalign(dir.path(), &["check", "Add nudge cooldown"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("# Alignment Report: Add nudge cooldown"));
    assert!(stdout.contains("**Overall Status:** ? MISSING_INFO"));
}

#[test]
fn aligned_blueprint_check_exits_zero() {
    let dir = workspace(&[
        (".taskalign/aliases.yaml", ALIASES),
        (".taskalign/bundles/blueprint.yaml", BLUEPRINT),
    ]);
    let output =
        run_taskalign(dir.path(), &["check", "Add Flashpoint Detector", "--checks", "blueprint"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("Component 'Flashpoint Detector' found in fusion.mmd"));
}

#[test]
fn cross_source_conflict_exits_one() {
    let dir = workspace(&[
        ("ctx/aliases.yaml", ALIASES),
        ("ctx/bundles/blueprint.yaml", BLUEPRINT),
        (
            "ctx/bundles/roadmap.yaml",
            "components:\n  - { id: PSYC-F01-C02, name: Flashpoint Detector, \
             boundary: ingestion only }\n",
        ),
    ]);
    let output = run_taskalign(
        dir.path(),
        &[
            "check",
            "Add Flashpoint Detector",
            "--bundles",
            "ctx/bundles",
            "--aliases",
            "ctx/aliases.yaml",
            "--checks",
            "blueprint,roadmap,coherence",
            "--json",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["overall_status"], "CONFLICTS");
    let coherence = &report["checks"][2];
    assert_eq!(coherence["source"], "Cross-Source Coherence");
    assert_eq!(coherence["conflicts"][0]["evidence"]["attribute"], "boundary");
}

#[test]
fn malformed_bundle_exits_three() {
    let dir = workspace(&[(".taskalign/bundles/roadmap.yaml", "matches: 7\n")]);
    let output = run_taskalign(dir.path(), &["check", "Add nudge cooldown"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr.contains("Malformed Roadmap bundle"));
}

#[test]
fn config_file_and_flags_are_layered() {
    let dir = workspace(&[("taskalign.yaml", "checks: roadmap\n")]);
    let output = run_taskalign(dir.path(), &["check", "Add nudge cooldown", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checks"].as_array().unwrap().len(), 1);

    let output = run_taskalign(dir.path(), &["check", "Add nudge cooldown", "--threshold", "2"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr.contains("semantic_threshold must be between 0 and 1"));
}

#[test]
fn output_flag_writes_report_file() {
    let dir = workspace(&[]);
    let output = run_taskalign(
        dir.path(),
        &["check", "Add nudge cooldown", "--output", "reports/nudge.md"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let written = fs::read_to_string(dir.path().join("reports/nudge.md")).unwrap();
    assert!(written.starts_with("# Alignment Report: Add nudge cooldown"));
}

#[test]
fn resolve_prints_canonical_names() {
    let dir = workspace(&[(".taskalign/aliases.yaml", ALIASES)]);
    let output = run_taskalign(dir.path(), &["resolve", "FD", "Timeline"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("FD -> flashpointdetector\n"));
    assert!(stdout.contains("Timeline -> timeline (not in alias table)"));
}

#[test]
fn help_lists_subcommands() {
    let dir = workspace(&[]);
    let output = run_taskalign(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("check"));
    assert!(stdout.contains("resolve"));
}

#[test]
fn unknown_subcommand_fails() {
    let dir = workspace(&[]);
    let output = run_taskalign(dir.path(), &["frobnicate"]);
    assert_eq!(output.status.code(), Some(3));
}
