//! config.toml 로드/저장 테스트.
use std::path::PathBuf;

use ts_catalog::config::{load_or_default, Config, ConfigError};

#[test]
fn missing_file_writes_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");

    let cfg = load_or_default(&path).expect("defaults");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());

    let again = load_or_default(&path).expect("reload");
    assert_eq!(again, cfg);
}

#[test]
fn saved_values_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let cfg = Config {
        language: "hu".into(),
        catalog_dir: PathBuf::from("/opt/librecad/ts"),
        catalog_prefix: "librecad".into(),
        log_filter: "ts_catalog=debug".into(),
    };
    cfg.save(&path).expect("save");
    assert_eq!(load_or_default(&path).expect("load"), cfg);
}

#[test]
fn partial_file_uses_defaults_for_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "language = \"hu\"\n").expect("write");

    let cfg = load_or_default(&path).expect("load");
    assert_eq!(cfg.language, "hu");
    assert_eq!(cfg.catalog_prefix, "plugins");
    assert_eq!(cfg.catalog_dir, PathBuf::from("ts"));
}

#[test]
fn invalid_toml_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "language = [").expect("write");

    assert!(matches!(load_or_default(&path), Err(ConfigError::Parse(_))));
}
