//! Tests for configuration loading and root folder resolution
//!
//! Tests that manipulate TABSHELF_ROOT_FOLDER are marked #[serial] so they
//! never race on the process environment.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tabshelf_common::config::{
    database_path, default_root_folder, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use tabshelf_common::Error;

#[test]
fn test_toml_config_parses_all_keys() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/tabshelf"
        host = "0.0.0.0"
        port = 8080
        seed_examples = false
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/tabshelf")));
    assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8080));
    assert_eq!(config.seed_examples, Some(false));
}

#[test]
fn test_toml_config_empty_document_is_default() {
    let config = TomlConfig::from_toml_str("").unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_toml_config_rejects_bad_types() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_toml_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 9000\n").unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.port, Some(9000));
    assert!(config.root_folder.is_none());
}

#[test]
fn test_database_path_inside_root() {
    let path = database_path(&PathBuf::from("/data/tabs"));
    assert_eq!(path, PathBuf::from("/data/tabs/tabshelf.db"));
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/tabshelf-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tabshelf-toml")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/tabshelf-cli")), &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/tabshelf-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/tabshelf-env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tabshelf-toml")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new(None, &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/tabshelf-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_without_cli_or_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/tabshelf-toml")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new(None, &toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/tabshelf-toml"));
}

#[test]
#[serial]
fn test_falls_back_to_compiled_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolver = RootFolderResolver::new(None, &TomlConfig::default());
    let root = resolver.resolve();

    assert!(!root.as_os_str().is_empty());
    assert_eq!(root, default_root_folder());
}
