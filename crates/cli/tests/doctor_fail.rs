use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn doctor_fails_when_explicit_config_missing() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope.toml");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdfront"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.args(["doctor", "--config", missing.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("FAIL mdfront doctor"))
        .stdout(predicate::str::contains("config file not found"));
}

#[test]
fn doctor_fails_on_bad_version() {
    let tmp = tempdir().unwrap();
    let cfg_dir = tmp.path().join("mdfront");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("config.toml"), "version = 3\n").unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdfront"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("version 3 is unsupported"))
        .stdout(predicate::str::contains("looked for:"));
}
