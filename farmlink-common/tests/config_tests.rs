//! Configuration resolution tests
//!
//! Note: tests that manipulate FARMLINK_* environment variables are marked
//! with #[serial] so they run sequentially, not in parallel.

use farmlink_common::config::{
    default_root_folder, AppConfig, ConfigOverrides, DEFAULT_BIND_ADDRESS, ENV_BIND,
    ENV_GEMINI_API_KEY, ENV_MAX_UPLOAD_MB, ENV_ROOT, ENV_SECRET_KEY,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn clear_env() {
    for name in [
        ENV_ROOT,
        ENV_BIND,
        ENV_SECRET_KEY,
        ENV_GEMINI_API_KEY,
        ENV_MAX_UPLOAD_MB,
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn defaults_when_nothing_configured() {
    clear_env();

    let config = AppConfig::resolve(ConfigOverrides::default()).unwrap();

    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.root_folder, default_root_folder());
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
    // A secret is generated when none is configured
    assert!(!config.secret_key.is_empty());
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    env::set_var(ENV_ROOT, "/tmp/farmlink-env-root");
    env::set_var(ENV_BIND, "127.0.0.1:6001");
    env::set_var(ENV_SECRET_KEY, "env-secret");
    env::set_var(ENV_GEMINI_API_KEY, "env-api-key");
    env::set_var(ENV_MAX_UPLOAD_MB, "7");

    let config = AppConfig::resolve(ConfigOverrides::default()).unwrap();

    assert_eq!(config.root_folder, PathBuf::from("/tmp/farmlink-env-root"));
    assert_eq!(config.bind_address, "127.0.0.1:6001");
    assert_eq!(config.secret_key, "env-secret");
    assert_eq!(config.gemini_api_key.as_deref(), Some("env-api-key"));
    assert_eq!(config.max_upload_bytes, 7 * 1024 * 1024);

    clear_env();
}

#[test]
#[serial]
fn toml_file_supplies_values() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
bind_address = "127.0.0.1:9999"
root_folder = "/tmp/farmlink-toml-root"
secret_key = "toml-secret"
gemini_api_key = "toml-api-key"
max_upload_mb = 5
"#,
    )
    .unwrap();

    let config = AppConfig::resolve(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.bind_address, "127.0.0.1:9999");
    assert_eq!(config.root_folder, PathBuf::from("/tmp/farmlink-toml-root"));
    assert_eq!(config.secret_key, "toml-secret");
    assert_eq!(config.gemini_api_key.as_deref(), Some("toml-api-key"));
    assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
}

#[test]
#[serial]
fn environment_beats_toml() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "secret_key = \"toml-secret\"\n").unwrap();
    env::set_var(ENV_SECRET_KEY, "env-secret");

    let config = AppConfig::resolve(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.secret_key, "env-secret");

    clear_env();
}

#[test]
#[serial]
fn overrides_beat_environment() {
    clear_env();
    env::set_var(ENV_ROOT, "/tmp/farmlink-env-root");

    let config = AppConfig::resolve(ConfigOverrides {
        root_folder: Some(PathBuf::from("/tmp/farmlink-cli-root")),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.root_folder, PathBuf::from("/tmp/farmlink-cli-root"));

    clear_env();
}

#[test]
#[serial]
fn explicitly_named_missing_config_file_is_an_error() {
    clear_env();

    let result = AppConfig::resolve(ConfigOverrides {
        config_file: Some(PathBuf::from("/nonexistent/farmlink.toml")),
        ..Default::default()
    });

    assert!(result.is_err());
}

#[test]
#[serial]
fn invalid_max_upload_is_an_error() {
    clear_env();
    env::set_var(ENV_MAX_UPLOAD_MB, "not-a-number");

    let result = AppConfig::resolve(ConfigOverrides::default());
    assert!(result.is_err());

    clear_env();
}

#[test]
fn database_and_media_paths_derive_from_root() {
    let config = AppConfig {
        bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        root_folder: PathBuf::from("/srv/farmlink"),
        secret_key: "s".to_string(),
        gemini_api_key: None,
        max_upload_bytes: 1024,
    };

    assert_eq!(config.database_path(), PathBuf::from("/srv/farmlink/farmlink.db"));
    assert_eq!(config.media_root(), PathBuf::from("/srv/farmlink/media"));
}
