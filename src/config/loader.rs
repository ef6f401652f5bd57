//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        environment = %config.environment,
        chain_id = config.network.chain_id,
        "Configuration loaded"
    );

    Ok(config)
}

/// Apply deployment environment variables on top of file settings.
///
/// `lookup` abstracts `std::env::var` so overrides can be exercised without
/// touching the process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("APP_ENV") {
        config.environment = value
            .parse()
            .map_err(|reason| ConfigError::Env { var: "APP_ENV", reason })?;
    }

    if let Some(value) = lookup("DEFAULT_CHAIN_ID") {
        config.network.chain_id = value.trim().parse().map_err(|e| ConfigError::Env {
            var: "DEFAULT_CHAIN_ID",
            reason: format!("{}", e),
        })?;
    }

    if let Some(value) = lookup("ENABLE_TESTNET") {
        config.network.testnet = value.trim() == "true";
    }

    if let Some(value) = lookup("ERROR_REPORTING") {
        config.error_reporting.enabled = Some(value.trim() != "false");
    }

    if let Some(value) = lookup("ERROR_REPORTING_DSN") {
        config.error_reporting.dsn = Some(value).filter(|dsn| !dsn.trim().is_empty());
    }

    if let Some(value) = lookup("LOG_LEVEL") {
        config.logging.min_level = Some(value.parse().map_err(|reason| ConfigError::Env {
            var: "LOG_LEVEL",
            reason,
        })?);
    }

    if let Some(value) = lookup("RPC_URL") {
        config.rpc.rpc_url = value;
    }

    Ok(())
}
