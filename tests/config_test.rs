//! Tests for config and secrets file loading.

use std::path::Path;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use mimir::config::PLACEHOLDER_API_KEY;
use mimir::{ClassifierManagerBuilder, Config, FailurePolicy, Secrets};

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
            [samples]
            base_dir = "/srv/bundles"

            [training]
            poll_interval_ms = 250
            on_job_failure = "abort"
        "#,
    )
    .unwrap();

    let config = assert_ok!(Config::load(Some(path.as_path())));
    assert_eq!(config.samples.base_dir, Path::new("/srv/bundles"));
    assert_eq!(config.training.poll_interval(), Duration::from_millis(250));
    assert_eq!(config.training.on_job_failure, FailurePolicy::Abort);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[training\nconcurrency = ").unwrap();

    let err = assert_err!(Config::load_from_file(&path));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn unknown_failure_policy_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[training]\non_job_failure = \"ignore\"\n").unwrap();

    assert_err!(Config::load_from_file(&path));
}

#[test]
fn secrets_file_supplies_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.toml");
    std::fs::write(&path, "api_key = \"from-file\"\n").unwrap();

    let secrets = assert_ok!(Secrets::load_from_file(&path));
    assert_eq!(secrets.api_key(), "from-file");
}

#[test]
fn empty_secrets_never_yield_empty_key() {
    let key = Secrets::default().api_key();
    assert!(!key.is_empty());
    if std::env::var("VISUAL_RECOGNITION_API_KEY").is_err() && std::env::var("API_KEY").is_err() {
        assert_eq!(key, PLACEHOLDER_API_KEY);
    }
}

#[test]
fn builder_from_config_applies_training_settings() {
    let config: Config = toml::from_str(
        r#"
            [training]
            concurrency = 3
            cooldown_secs = 0
            on_job_failure = "abort"
        "#,
    )
    .unwrap();

    let manager = assert_ok!(ClassifierManagerBuilder::from_config(&config).api_key("k").build());
    let orchestrator = manager.orchestrator().config();
    assert_eq!(orchestrator.concurrency, 3);
    assert_eq!(orchestrator.cooldown, Duration::ZERO);
    assert_eq!(orchestrator.failure_policy, FailurePolicy::Abort);
}
