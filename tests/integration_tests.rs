use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

// Helper function to create a test environment
fn setup_test_environment() -> Result<TempDir> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();

  fs::create_dir_all(root.join("headers"))?;
  fs::write(root.join("headers/new.txt"), "// Copyright 2025 New Owner\n")?;
  fs::write(root.join("headers/old.txt"), "// Copyright 2019 Old Owner\n")?;
  fs::write(root.join("headers/generated.txt"), "// Code generated. DO NOT EDIT.\n")?;

  fs::create_dir_all(root.join("project/src/nested"))?;
  fs::write(
    root.join("project/src/main.rs"),
    "// Copyright 2019 Old Owner\nfn main() {}\n",
  )?;
  fs::write(root.join("project/src/nested/lib.rs"), "pub fn add() {}\n")?;
  fs::write(
    root.join("project/src/gen.rs"),
    "// Code generated. DO NOT EDIT.\npub const X: u8 = 1;\n",
  )?;
  fs::write(root.join("project/README.md"), "# Project\n")?;

  Ok(temp_dir)
}

fn headerbatch(current_dir: &Path) -> Command {
  let mut cmd = Command::cargo_bin("headerbatch").expect("binary is built");
  cmd.current_dir(current_dir).env_remove("HEADERBATCH_CONFIG").env_remove("RUST_LOG");
  cmd
}

#[test]
fn test_patch_tree_from_cli() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();
  fs::write(root.join("deny.txt"), "*.md\n")?;

  headerbatch(root)
    .args([
      "--header",
      "headers/new.txt",
      "--remove",
      "headers/old.txt",
      "--skip-header",
      "headers/generated.txt",
      "--deny-list",
      "deny.txt",
      "project",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Headers added: 2"));

  assert_eq!(
    fs::read_to_string(root.join("project/src/main.rs"))?,
    "// Copyright 2025 New Owner\nfn main() {}\n"
  );
  assert_eq!(
    fs::read_to_string(root.join("project/src/nested/lib.rs"))?,
    "// Copyright 2025 New Owner\npub fn add() {}\n"
  );
  assert_eq!(
    fs::read_to_string(root.join("project/src/gen.rs"))?,
    "// Code generated. DO NOT EDIT.\npub const X: u8 = 1;\n"
  );
  assert_eq!(fs::read_to_string(root.join("project/README.md"))?, "# Project\n");

  Ok(())
}

#[test]
fn test_quiet_mode_prints_only_count() -> Result<()> {
  let temp_dir = setup_test_environment()?;

  headerbatch(temp_dir.path())
    .args(["-q", "-H", "headers/new.txt", "project/src/nested/lib.rs"])
    .assert()
    .success()
    .stdout(predicate::eq("Headers added: 1\n"));

  Ok(())
}

#[test]
fn test_allow_list_patterns_follow_target_spelling() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();
  fs::write(root.join("allow.txt"), "project/src/*.rs\n")?;

  headerbatch(root)
    .args(["-H", "headers/new.txt", "-a", "allow.txt", "project"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Headers added: 3"));

  assert_eq!(fs::read_to_string(root.join("project/README.md"))?, "# Project\n");
  Ok(())
}

#[test]
fn test_invalid_target_fails() -> Result<()> {
  let temp_dir = setup_test_environment()?;

  headerbatch(temp_dir.path())
    .args(["-H", "headers/new.txt", "does-not-exist"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("neither a file nor a directory"));

  Ok(())
}

#[test]
fn test_missing_header_fails() -> Result<()> {
  let temp_dir = setup_test_environment()?;

  headerbatch(temp_dir.path())
    .args(["-H", "headers/absent.txt", "project"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Header to insert not found"));

  // Nothing was modified
  assert_eq!(
    fs::read_to_string(temp_dir.path().join("project/src/nested/lib.rs"))?,
    "pub fn add() {}\n"
  );
  Ok(())
}

#[test]
fn test_no_header_configured_fails() -> Result<()> {
  let temp_dir = setup_test_environment()?;

  headerbatch(temp_dir.path())
    .args(["project"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No header to insert"));

  Ok(())
}

#[test]
fn test_config_file_is_discovered() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();
  fs::write(
    root.join(".headerbatch.toml"),
    concat!(
      "header = \"headers/new.txt\"\n",
      "remove = [\"headers/old.txt\"]\n",
      "ignore = [\"headers/generated.txt\"]\n",
    ),
  )?;

  headerbatch(root)
    .arg("project/src")
    .assert()
    .success()
    .stdout(predicate::str::contains("Headers added: 2"));

  assert_eq!(
    fs::read_to_string(root.join("project/src/main.rs"))?,
    "// Copyright 2025 New Owner\nfn main() {}\n"
  );
  Ok(())
}

#[test]
fn test_cli_overrides_config_header() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();
  fs::write(root.join("headers/cli.txt"), "# CLI\n")?;
  fs::write(root.join("custom.toml"), "header = \"headers/new.txt\"\n")?;

  headerbatch(root)
    .args(["--config", "custom.toml", "-H", "headers/cli.txt", "project/README.md"])
    .assert()
    .success();

  assert_eq!(fs::read_to_string(root.join("project/README.md"))?, "# CLI\n# Project\n");
  Ok(())
}

#[test]
fn test_no_config_ignores_config_file() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();
  fs::write(root.join(".headerbatch.toml"), "header = \"headers/new.txt\"\n")?;

  headerbatch(root)
    .args(["--no-config", "project"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No header to insert"));

  Ok(())
}

#[test]
fn test_report_json() -> Result<()> {
  let temp_dir = setup_test_environment()?;
  let root = temp_dir.path();

  headerbatch(root)
    .args([
      "-H",
      "headers/new.txt",
      "-r",
      "headers/old.txt",
      "-s",
      "headers/generated.txt",
      "--report-json",
      "report.json",
      "project",
    ])
    .assert()
    .success();

  let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(root.join("report.json"))?)?;
  assert_eq!(report["patched"], 3);
  assert_eq!(report["stripped"], 1);
  assert_eq!(report["ignored_header"], 1);
  assert_eq!(report["failed"], 0);
  Ok(())
}
