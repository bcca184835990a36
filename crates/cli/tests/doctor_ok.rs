use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = r#"
version = 1
placeholder = "Start writing..."

[frontmatter]
title = ""
date = "$currentDate"

[logging]
level = "warn"
"#;
    write_file(&cfg, toml);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdfront"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   mdfront doctor"))
        .stdout(predicate::str::contains("placeholder: Start writing..."))
        .stdout(predicate::str::contains("  date: $currentDate"))
        .stdout(predicate::str::contains("logging.level: warn"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("mdfront").join("config.toml");
    write_file(&cfg_path, "version = 1\n[frontmatter]\nlayout = \"post\"\n");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdfront"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   mdfront doctor"))
        .stdout(predicate::str::contains("  layout: post"));
}

#[test]
fn doctor_without_default_config_uses_defaults() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdfront"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("frontmatter: (empty block)"));
}
