//! File-based loading for bevy-tagger-config.

use bevy_tagger_config::{TagsConfig, TagsConfigError};
use std::fs;
use tempfile::TempDir;

/// Write `content` to a tags.toml inside a fresh temp directory.
fn setup_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("tags.toml");
    fs::write(&config_path, content).unwrap();
    (dir, config_path)
}

#[test]
fn loads_tags_from_file() {
    let (_dir, path) = setup_config(
        r##"
max_name_attempts = 5

[[tags]]
name = "Platonic"
color = "#336699"
comment = "Regular convex polyhedra"
"##,
    );

    let config = TagsConfig::from_file(&path).unwrap();
    assert_eq!(config.max_name_attempts, 5);

    let platonic = config.get("Platonic").unwrap();
    assert_eq!(platonic.color, [0x33, 0x66, 0x99]);
    assert_eq!(platonic.comment, "Regular convex polyhedra");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let err = TagsConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, TagsConfigError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.toml"));
}

#[test]
fn malformed_file_is_parse_error() {
    let (_dir, path) = setup_config("[[tags]\nname = ");

    let err = TagsConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, TagsConfigError::Parse(_)));
}

#[test]
fn invalid_entry_is_validation_error() {
    let (_dir, path) = setup_config(
        r#"
[[tags]]
name = "A"

[[tags]]
name = "A"
"#,
    );

    let err = TagsConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, TagsConfigError::Validation(_)));
}
