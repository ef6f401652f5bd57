//! Configuration schema definitions.
//!
//! The file-level settings keep environment-dependent values optional; the
//! `*_config()` accessors on [`AppConfig`] resolve them into the immutable
//! runtime configs handed to the logger, reporter and chain client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chain::types::Network;
use crate::chain::wallet::PRIVATE_KEY_ENV_VAR;
use crate::observability::logger::LogLevel;

/// Root configuration for the transfer pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment; drives logging and reporting defaults.
    pub environment: Environment,

    /// Application logger settings.
    pub logging: LoggingSettings,

    /// Error reporting settings.
    pub error_reporting: ErrorReportingSettings,

    /// Network the pipeline requires transfers to be sent on.
    pub network: NetworkConfig,

    /// JSON-RPC client settings.
    pub rpc: RpcConfig,

    /// Persisted local state.
    pub storage: StorageConfig,

    /// Metrics exposition.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Resolve the logger config for the configured environment.
    pub fn logger_config(&self) -> LoggerConfig {
        let defaults = LoggerConfig::for_environment(self.environment);
        LoggerConfig {
            min_level: self.logging.min_level.unwrap_or(defaults.min_level),
            enable_console: self.logging.enable_console,
            enable_remote: self.logging.enable_remote.unwrap_or(defaults.enable_remote),
            remote_endpoint: self
                .logging
                .remote_endpoint
                .clone()
                .filter(|endpoint| !endpoint.trim().is_empty()),
        }
    }

    /// Resolve the error reporting config for the configured environment.
    pub fn error_reporting_config(&self) -> ErrorReportingConfig {
        let defaults = ErrorReportingConfig::for_environment(self.environment);
        ErrorReportingConfig {
            enabled: self.error_reporting.enabled.unwrap_or(defaults.enabled),
            dsn: self
                .error_reporting
                .dsn
                .clone()
                .filter(|dsn| !dsn.trim().is_empty()),
            environment: self.environment,
            sample_rate: self.error_reporting.sample_rate,
        }
    }

    /// Resolve the required network.
    pub fn network(&self) -> Network {
        self.network.resolve()
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Logger settings as they appear in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level; `info` in production, `debug` otherwise when unset.
    pub min_level: Option<LogLevel>,

    /// Write entries to the console sink.
    pub enable_console: bool,

    /// Forward entries to the remote sink; production only when unset.
    pub enable_remote: Option<bool>,

    /// Remote log collector endpoint.
    pub remote_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            min_level: None,
            enable_console: true,
            enable_remote: None,
            remote_endpoint: None,
        }
    }
}

/// Resolved logger configuration. Fixed for the lifetime of a [`Logger`].
///
/// [`Logger`]: crate::observability::Logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub enable_console: bool,
    pub enable_remote: bool,
    pub remote_endpoint: Option<String>,
}

impl LoggerConfig {
    pub fn for_environment(environment: Environment) -> Self {
        let production = environment.is_production();
        Self {
            min_level: if production { LogLevel::Info } else { LogLevel::Debug },
            enable_console: true,
            enable_remote: production,
            remote_endpoint: None,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Error reporting settings as they appear in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorReportingSettings {
    /// Enable reporting; production only when unset.
    pub enabled: Option<bool>,

    /// Endpoint reports are forwarded to. Absent means local logging only.
    pub dsn: Option<String>,

    /// Fraction of reports kept, in `[0, 1]`.
    pub sample_rate: f64,
}

impl Default for ErrorReportingSettings {
    fn default() -> Self {
        Self {
            enabled: None,
            dsn: None,
            sample_rate: 1.0,
        }
    }
}

/// Resolved error reporting configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReportingConfig {
    pub enabled: bool,
    pub dsn: Option<String>,
    pub environment: Environment,
    pub sample_rate: f64,
}

impl ErrorReportingConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            enabled: environment.is_production(),
            dsn: None,
            environment,
            sample_rate: 1.0,
        }
    }
}

impl Default for ErrorReportingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Required network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Required chain ID (8453 = Base).
    pub chain_id: u64,

    /// Use the Base testnet instead of `chain_id`.
    pub testnet: bool,

    /// Display name override for chains without a built-in entry.
    pub name: Option<String>,

    /// Block explorer override.
    pub explorer_url: Option<String>,
}

impl NetworkConfig {
    pub fn resolve(&self) -> Network {
        let mut network = if self.testnet {
            Network::base_goerli()
        } else {
            Network::by_id(self.chain_id).unwrap_or_else(|| Network {
                id: self.chain_id,
                name: format!("chain {}", self.chain_id),
                explorer_url: String::new(),
            })
        };
        if let Some(name) = &self.name {
            network.name = name.clone();
        }
        if let Some(url) = &self.explorer_url {
            network.explorer_url = url.trim_end_matches('/').to_string();
        }
        network
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: Network::BASE_ID,
            testnet: false,
            name: None,
            explorer_url: None,
        }
    }
}

/// JSON-RPC client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// RPC read timeout in seconds.
    pub timeout_secs: u64,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Environment variable holding the signing key.
    pub private_key_env: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.base.org".to_string(),
            failover_urls: Vec::new(),
            timeout_secs: 10,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
            private_key_env: PRIVATE_KEY_ENV_VAR.to_string(),
        }
    }
}

/// Persisted local state configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the local store. `None` keeps state in memory.
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Some("transfer-pipeline.state.json".to_string()),
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
