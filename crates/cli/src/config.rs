//! # Application Configuration
//!
//! Loads the settings of the `mdenrich` CLI from built-in defaults, an
//! optional `mdenrich.yml` file and `MDENRICH_*` environment variables, in
//! that order of precedence.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use mdenrich::constants::{DEFAULT_API_VERSION, DEFAULT_ENRICHMENT_ENDPOINT, DEFAULT_MAX_TOKENS};
use mdenrich::{EnrichmentOptions, MissingBodyPolicy};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mdenrich.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required file or value was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `mdenrich.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of the org, e.g. `https://example.my.salesforce.com`.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub missing_body_policy: MissingBodyPolicy,
    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENRICHMENT_ENDPOINT.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl AppConfig {
    /// The instance URL, or an error naming the setting that is missing.
    pub fn require_instance_url(&self) -> Result<&str, ConfigError> {
        require(self.instance_url.as_deref(), "instance_url", "MDENRICH_INSTANCE_URL")
    }

    /// The access token, or an error naming the setting that is missing.
    pub fn require_access_token(&self) -> Result<&str, ConfigError> {
        require(self.access_token.as_deref(), "access_token", "MDENRICH_ACCESS_TOKEN")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn enrichment_options(&self) -> EnrichmentOptions {
        EnrichmentOptions {
            endpoint: self.endpoint.clone(),
            max_tokens: self.max_tokens,
            missing_body_policy: self.missing_body_policy,
        }
    }
}

fn require<'a>(value: Option<&'a str>, key: &str, env_var: &str) -> Result<&'a str, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::NotFound(format!(
            "Missing required setting '{key}'. Set it in {DEFAULT_CONFIG_FILE} or via {env_var}."
        ))),
    }
}

// Reads a file and substitutes `${VAR}` placeholders from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// `config_path_override` points at a file that must exist. Without it,
/// `mdenrich.yml` in the working directory is used when present. Any key can
/// be overridden by `MDENRICH_<KEY>` (e.g. `MDENRICH_MAX_TOKENS`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("api_version", DEFAULT_API_VERSION)?
        .set_default("endpoint", DEFAULT_ENRICHMENT_ENDPOINT)?
        .set_default("max_tokens", i64::from(DEFAULT_MAX_TOKENS))?;

    // Layer 2: Config file.
    let config_path = config_path_override.unwrap_or(DEFAULT_CONFIG_FILE);
    match read_and_substitute(config_path)? {
        Some(content) => {
            info!("Loading configuration from '{config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None if config_path_override.is_some() => {
            return Err(ConfigError::NotFound(format!(
                "Config file not found at '{config_path}'."
            )));
        }
        None => {}
    }

    let settings = builder
        // Layer 3: Prefixed environment variables.
        .add_source(
            Environment::with_prefix("MDENRICH")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
