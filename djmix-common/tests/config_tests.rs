//! Tests for configuration file resolution
//!
//! Uses serial_test: tests touching DJMIX_CONFIG run sequentially.

use djmix_common::config::{default_config_path, MixSettings, CONFIG_ENV_VAR};
use djmix_common::Error;
use serial_test::serial;
use std::env;

#[test]
fn test_default_path_is_under_djmix() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("djmix/config.toml"));
    }
}

#[test]
#[serial]
fn test_env_var_to_missing_file_degrades_gracefully() {
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/djmix/config.toml");
    let result = MixSettings::load(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert!(result.is_ok(), "missing optional config must not be fatal");
}

#[test]
#[serial]
fn test_explicit_path_wins_over_env_var() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("env.toml");
    let explicit = dir.path().join("explicit.toml");
    std::fs::write(&env_file, "transition_bars = 4\n").unwrap();
    std::fs::write(&explicit, "transition_bars = 32\nsync_beats = false\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &env_file);
    let settings = MixSettings::load(Some(&explicit));
    env::remove_var(CONFIG_ENV_VAR);

    let settings = settings.unwrap();
    assert_eq!(settings.transition_bars, 32);
    assert!(!settings.sync_beats);
    assert!(settings.match_tempo);
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "transition_bars = [\n").unwrap();

    assert!(matches!(MixSettings::load(Some(&path)), Err(Error::Toml(_))));
}

#[test]
fn test_non_finite_target_rejected() {
    let settings = MixSettings {
        target_db: f64::NAN,
        ..MixSettings::default()
    };
    assert!(matches!(settings.validate(), Err(Error::Config(_))));
}
