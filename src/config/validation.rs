//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sample rate, timeouts, chain id)
//! - Check that every configured endpoint parses as a URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ConfigIssue>>

use std::fmt;

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    let rate = config.error_reporting.sample_rate;
    if !(0.0..=1.0).contains(&rate) {
        issues.push(ConfigIssue::new(
            "error_reporting.sample_rate",
            format!("{} is outside [0, 1]", rate),
        ));
    }

    // Blank endpoints mean "not configured".
    if let Some(dsn) = non_blank(&config.error_reporting.dsn) {
        check_url(&mut issues, "error_reporting.dsn", dsn);
    }

    if let Some(endpoint) = non_blank(&config.logging.remote_endpoint) {
        check_url(&mut issues, "logging.remote_endpoint", endpoint);
    }

    check_url(&mut issues, "rpc.rpc_url", &config.rpc.rpc_url);
    for url in &config.rpc.failover_urls {
        check_url(&mut issues, "rpc.failover_urls", url);
    }

    if config.rpc.timeout_secs == 0 {
        issues.push(ConfigIssue::new("rpc.timeout_secs", "must be greater than 0"));
    }

    if config.rpc.gas_price_multiplier <= 0.0 {
        issues.push(ConfigIssue::new(
            "rpc.gas_price_multiplier",
            "must be greater than 0",
        ));
    }

    if !config.network.testnet && config.network.chain_id == 0 {
        issues.push(ConfigIssue::new("network.chain_id", "must not be 0"));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn check_url(issues: &mut Vec<ConfigIssue>, field: &'static str, value: &str) {
    if let Err(e) = Url::parse(value) {
        issues.push(ConfigIssue::new(field, format!("'{}' is not a valid URL: {}", value, e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_issue() {
        let mut config = AppConfig::default();
        config.error_reporting.sample_rate = 1.5;
        config.error_reporting.dsn = Some("not a url".to_string());
        config.rpc.timeout_secs = 0;
        config.network.chain_id = 0;

        let issues = validate_config(&config).unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "error_reporting.sample_rate",
                "error_reporting.dsn",
                "rpc.timeout_secs",
                "network.chain_id",
            ]
        );
    }

    #[test]
    fn test_blank_endpoints_are_unset() {
        let mut config = AppConfig::default();
        config.error_reporting.dsn = Some(String::new());
        config.logging.remote_endpoint = Some("  ".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_sample_rate_bounds_inclusive() {
        let mut config = AppConfig::default();
        config.error_reporting.sample_rate = 0.0;
        assert!(validate_config(&config).is_ok());
        config.error_reporting.sample_rate = 1.0;
        assert!(validate_config(&config).is_ok());
    }
}
