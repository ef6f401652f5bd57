//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: APP_ENV, DEFAULT_CHAIN_ID, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → resolved LoggerConfig / ErrorReportingConfig / Network
//!     → shared via Arc with the pipeline
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start; reconfiguration means a new Logger
//! - All fields have defaults to allow minimal configs
//! - Environment-dependent defaults are resolved after loading

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, load_config_with, ConfigError};
pub use schema::{
    AppConfig, Environment, ErrorReportingConfig, LoggerConfig, NetworkConfig, RpcConfig,
    StorageConfig,
};
