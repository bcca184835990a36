use mdfront_core::config::loader::{ConfigError, ConfigLoader};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn missing_file_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("nope/config.toml");
    let err = ConfigLoader::load(Some(&cfg_path)).unwrap_err();
    match err {
        ConfigError::NotFound(_) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn bad_version_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 2\n");

    let err = ConfigLoader::load(Some(&cfg_path)).unwrap_err();
    match err {
        ConfigError::BadVersion(2) => {}
        other => panic!("expected BadVersion(2), got {other:?}"),
    }
}

#[test]
fn invalid_toml_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 1\n[frontmatter\n");

    let err = ConfigLoader::load(Some(&cfg_path)).unwrap_err();
    match err {
        ConfigError::ParseError(origin, _) => assert!(origin.ends_with("config.toml")),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn non_string_template_value_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 1\n[frontmatter]\ndraft = true\n");

    let err = ConfigLoader::load(Some(&cfg_path)).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(..)), "got {err:?}");
}

#[test]
fn directory_is_a_read_error() {
    let tmp = tempdir().unwrap();
    let err = ConfigLoader::load(Some(tmp.path())).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError(..)), "got {err:?}");
}
