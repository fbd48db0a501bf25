//! Tests for configuration resolution priority and graceful degradation
//!
//! Uses serial_test: tests that touch ECOSCAN_* environment variables are
//! marked #[serial] so they never race each other.

use ecoscan_common::config::{
    load_toml_config, ClientConfig, ConfigOverrides, TomlConfig, DEFAULT_ENDPOINT,
    DEFAULT_MAX_HISTORY, ENV_ENDPOINT, ENV_ROOT_FOLDER,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_ENDPOINT);
    env::remove_var(ENV_ROOT_FOLDER);
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_env();

    let config = ClientConfig::resolve(ConfigOverrides::default(), TomlConfig::default()).unwrap();

    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.max_history, DEFAULT_MAX_HISTORY);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.location_timeout, Duration::from_secs(10));
    assert!(config.location.is_none());
    assert!(!config.root_folder.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_ENDPOINT, "http://env-host:5000/classify");
    env::set_var(ENV_ROOT_FOLDER, "/tmp/ecoscan-env-root");

    let toml_config = TomlConfig {
        endpoint: Some("http://toml-host:5000/classify".to_string()),
        root_folder: Some(PathBuf::from("/tmp/ecoscan-toml-root")),
        ..Default::default()
    };
    let config = ClientConfig::resolve(ConfigOverrides::default(), toml_config).unwrap();

    assert_eq!(config.endpoint, "http://env-host:5000/classify");
    assert_eq!(config.root_folder, PathBuf::from("/tmp/ecoscan-env-root"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_ENDPOINT, "http://env-host:5000/classify");

    let overrides = ConfigOverrides {
        endpoint: Some("http://cli-host:5000/classify".to_string()),
        root_folder: Some(PathBuf::from("/tmp/ecoscan-cli-root")),
    };
    let config = ClientConfig::resolve(overrides, TomlConfig::default()).unwrap();

    assert_eq!(config.endpoint, "http://cli-host:5000/classify");
    assert_eq!(config.root_folder, PathBuf::from("/tmp/ecoscan-cli-root"));

    clear_env();
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_config_file_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
endpoint = "http://10.0.0.5:5000/classify"
max_history = 25
location_timeout_secs = 3

[location]
lat = 51.5
lon = -0.12

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.endpoint.as_deref(), Some("http://10.0.0.5:5000/classify"));
    assert_eq!(config.max_history, Some(25));
    assert_eq!(config.location_timeout_secs, Some(3));
    assert_eq!(config.logging.level, "debug");
    let location = config.location.unwrap();
    assert_eq!(location.lat, 51.5);
    assert_eq!(location.lon, -0.12);
}

#[test]
fn test_unparsable_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "endpoint = [not toml").unwrap();

    assert!(load_toml_config(Some(&path)).is_err());
}
