//! # Configuration Tests
//!
//! Layering of defaults, the YAML file and `MDENRICH_*` environment variables.

use mdenrich::MissingBodyPolicy;
use mdenrich_cli::config::{get_config, ConfigError};
use std::env;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

// Tests mutating the process environment must not run in parallel.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env_vars() {
    for var in [
        "MDENRICH_INSTANCE_URL",
        "MDENRICH_ACCESS_TOKEN",
        "MDENRICH_API_VERSION",
        "MDENRICH_ENDPOINT",
        "MDENRICH_MAX_TOKENS",
        "MDENRICH_MISSING_BODY_POLICY",
        "MDENRICH_REQUEST_TIMEOUT_SECS",
        "MDENRICH_TEST_TOKEN",
    ] {
        env::remove_var(var);
    }
}

fn write_config(dir: &tempfile::TempDir, content: &str) -> String {
    let path = dir.path().join("mdenrich.yml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_defaults_without_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let config = get_config(None).expect("defaults should load");

    assert!(config.instance_url.is_none());
    assert_eq!(config.api_version, "65.0");
    assert_eq!(config.endpoint, "/metadata-intelligence/enrich");
    assert_eq!(config.max_tokens, 50);
    assert_eq!(config.missing_body_policy, MissingBodyPolicy::Fail);
    assert!(config.request_timeout().is_none());
    assert!(config.require_access_token().is_err());
}

#[test]
fn test_file_values_with_substitution() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("MDENRICH_TEST_TOKEN", "secret-token");
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "instance_url: https://example.my.salesforce.com\n\
         access_token: ${MDENRICH_TEST_TOKEN}\n\
         max_tokens: 120\n\
         missing_body_policy: skip\n\
         request_timeout_secs: 30\n",
    );

    let config = get_config(Some(&path)).expect("file config should load");

    assert_eq!(
        config.require_instance_url().unwrap(),
        "https://example.my.salesforce.com"
    );
    assert_eq!(config.require_access_token().unwrap(), "secret-token");
    assert_eq!(config.max_tokens, 120);
    assert_eq!(config.missing_body_policy, MissingBodyPolicy::Skip);
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    let options = config.enrichment_options();
    assert_eq!(options.max_tokens, 120);
    assert_eq!(options.missing_body_policy, MissingBodyPolicy::Skip);

    clear_env_vars();
}

#[test]
fn test_environment_overrides_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "max_tokens: 120\napi_version: \"64.0\"\n");
    env::set_var("MDENRICH_MAX_TOKENS", "300");
    env::set_var("MDENRICH_ACCESS_TOKEN", "env-token");

    let config = get_config(Some(&path)).expect("config should load");

    assert_eq!(config.max_tokens, 300);
    assert_eq!(config.api_version, "64.0");
    assert_eq!(config.access_token.as_deref(), Some("env-token"));

    clear_env_vars();
}

#[test]
fn test_missing_override_file_is_an_error() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let result = get_config(Some("/definitely/not/here/mdenrich.yml"));

    match result {
        Err(ConfigError::NotFound(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_blank_required_value_is_missing() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("MDENRICH_INSTANCE_URL", "   ");

    let config = get_config(None).expect("config should load");
    let error = config.require_instance_url().unwrap_err();

    assert!(error.to_string().contains("instance_url"));
    clear_env_vars();
}
