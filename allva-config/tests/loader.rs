use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use allva_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, ConfigSource,
    EnvConfig,
};
use tempfile::tempdir;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("allva.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn file_values_override_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
        [login]
        max_failed_attempts = 3
        tick_interval = "30s"

        [preferences]
        path = "/tmp/allva-test/preferences.dat"

        [localization]
        languages = ["en", "es"]
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .with_env(EnvConfig::default())
        .load()
        .expect("config loads");

    assert_eq!(load.source, ConfigSource::File(path));
    assert_eq!(load.config.login.max_failed_attempts, 3);
    assert_eq!(load.config.login.lockout_ticks, 15);
    assert_eq!(load.config.login.tick_interval, Duration::from_secs(30));
    assert_eq!(
        load.config.preferences.path,
        PathBuf::from("/tmp/allva-test/preferences.dat")
    );
    assert_eq!(load.config.localization.languages, vec!["en", "es"]);
}

#[test]
fn env_overrides_win_over_file() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
        [login]
        lockout_ticks = 10
        "#,
    );

    let env = EnvConfig::from_pairs([
        ("ALLVA_CONFIG", path.to_string_lossy().into_owned()),
        ("ALLVA_LOCKOUT_TICKS", "20".to_string()),
        ("ALLVA_AUTH_TIMEOUT", "5s".to_string()),
        ("ALLVA_LANGUAGES", "en".to_string()),
    ]);

    let load = ConfigLoader::new().with_env(env).load().expect("loads");

    assert_eq!(load.source, ConfigSource::File(path));
    assert_eq!(load.config.login.lockout_ticks, 20);
    assert_eq!(load.config.auth.request_timeout, Duration::from_secs(5));
    assert_eq!(load.config.localization.languages, vec!["en"]);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let result = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env(EnvConfig::default())
        .load();

    assert!(matches!(result, Err(ConfigLoadError::ReadFile { .. })));
}

#[test]
fn malformed_override_reports_the_key() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(&dir, "");
    let env = EnvConfig::from_pairs([("ALLVA_MAX_FAILED_ATTEMPTS", "five")]);
    let err = ConfigLoader::new()
        .with_config_path(path)
        .with_env(env)
        .load()
        .expect_err("non-numeric override");

    match err {
        ConfigLoadError::InvalidNumber { key, value, .. } => {
            assert_eq!(key, "ALLVA_MAX_FAILED_ATTEMPTS");
            assert_eq!(value, "five");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn guard_rails_reject_zero_interval() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
        [login]
        tick_interval = "0s"
        "#,
    );

    let err = ConfigLoader::new()
        .with_config_path(path)
        .with_env(EnvConfig::default())
        .load()
        .expect_err("zero interval");

    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::ZeroTickInterval)
    ));
}
