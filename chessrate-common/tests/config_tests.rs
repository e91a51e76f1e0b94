//! Tests for config file resolution, loading and atomic writes
//!
//! Tests that touch CHESSRATE_CONFIG are marked #[serial] so they do not
//! race each other on the process environment.

use chessrate_common::config::{
    default_config_path, read_toml_config, resolve_config_path, write_toml_file, LoggingConfig,
    Settings, SettingsOverrides, TomlConfig, CONFIG_ENV_VAR,
};
use chessrate_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/chessrate-env.toml");

    let path = resolve_config_path(Some(Path::new("/tmp/chessrate-cli.toml")));
    assert_eq!(path, Some(PathBuf::from("/tmp/chessrate-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_path_used_without_cli_arg() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/chessrate-env.toml");

    let path = resolve_config_path(None);
    assert_eq!(path, Some(PathBuf::from("/tmp/chessrate-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_default_path_ends_in_app_dir() {
    env::remove_var(CONFIG_ENV_VAR);

    let path = resolve_config_path(None);
    assert_eq!(path, default_config_path());
    if let Some(path) = path {
        assert!(path.ends_with("chessrate/config.toml"));
    }
}

#[test]
fn test_missing_file_reads_as_none() {
    let temp_dir = TempDir::new().unwrap();
    let config = read_toml_config(&temp_dir.path().join("absent.toml")).unwrap();
    assert!(config.is_none());
    assert_eq!(config.unwrap_or_default(), TomlConfig::default());
}

#[test]
fn test_partial_file_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "timeout_secs = 3\nstrict_pairing = true\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = read_toml_config(&path).unwrap().unwrap();
    assert_eq!(config.timeout_secs, Some(3));
    assert_eq!(config.strict_pairing, Some(true));
    assert_eq!(config.logging.level.as_deref(), Some("debug"));
    assert!(config.user_agent.is_none());

    let settings = Settings::resolve(&config, &SettingsOverrides::default()).unwrap();
    assert_eq!(settings.timeout, Duration::from_secs(3));
    assert!(settings.strict_pairing);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

    let err = read_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_write_then_load_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let config = TomlConfig {
        user_agent: Some("rating-table/2.0".to_string()),
        max_concurrent_pairs: Some(8),
        logging: LoggingConfig {
            level: Some("info".to_string()),
        },
        ..Default::default()
    };

    write_toml_file(&config, &path).unwrap();

    assert!(path.exists());
    assert!(!temp_dir.path().join("nested").join("config.toml.tmp").exists());
    assert_eq!(read_toml_config(&path).unwrap(), Some(config));
}

#[cfg(unix)]
#[test]
fn test_written_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    write_toml_file(&TomlConfig::default(), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
