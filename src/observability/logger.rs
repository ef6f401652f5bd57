//! Structured application logger.
//!
//! # Responsibilities
//! - Filter entries against the configured minimum level
//! - Offer every surviving entry to each enabled sink (console, remote)
//! - Flatten error values into the entry context
//!
//! # Design Decisions
//! - One `Logger` per config; the level never changes after construction
//! - Sink failures are swallowed so logging never fails the caller

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::schema::LoggerConfig;
use crate::observability::metrics;
use crate::observability::sink::{HttpSink, LogSink, NullSink, TracingSink};

/// Structured key-value context attached to entries and reports.
pub type Context = serde_json::Map<String, Value>;

/// Log severity, ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Console tag, e.g. `[WARN]`.
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// A single emitted log record.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

/// Flattened view of an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    /// Rendered `source()` chain, outermost cause first.
    pub stack: Option<String>,
    pub name: String,
}

impl ErrorInfo {
    /// Capture an error, its type name and its cause chain.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        let full_name = std::any::type_name::<E>();
        let name = full_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(full_name);

        Self {
            message: err.to_string(),
            stack: if causes.is_empty() {
                None
            } else {
                Some(causes.join("\n"))
            },
            name: name.to_string(),
        }
    }

    /// Wrap a bare message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            name: "Error".to_string(),
        }
    }

    fn to_value(&self) -> Value {
        serde_json::json!({
            "message": self.message,
            "stack": self.stack,
            "name": self.name,
        })
    }
}

impl From<&str> for ErrorInfo {
    fn from(message: &str) -> Self {
        Self::from_message(message)
    }
}

impl From<String> for ErrorInfo {
    fn from(message: String) -> Self {
        Self::from_message(message)
    }
}

/// Level-filtered logger with console and remote sinks.
pub struct Logger {
    config: LoggerConfig,
    console: Arc<dyn LogSink>,
    remote: Arc<dyn LogSink>,
}

impl Logger {
    /// Build a logger with the default sinks: `tracing` for the console and
    /// an HTTP forwarder when a remote endpoint is configured.
    pub fn new(config: LoggerConfig) -> Self {
        let remote: Arc<dyn LogSink> = match config.remote_endpoint.as_deref() {
            Some(endpoint) if config.enable_remote => match HttpSink::new(endpoint) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Remote log sink disabled");
                    Arc::new(NullSink)
                }
            },
            _ => Arc::new(NullSink),
        };
        Self::with_sinks(config, Arc::new(TracingSink), remote)
    }

    pub fn with_sinks(
        config: LoggerConfig,
        console: Arc<dyn LogSink>,
        remote: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            console,
            remote,
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn debug(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Debug, message, context);
    }

    pub fn info(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Warn, message, context);
    }

    /// Log an error; `error` is flattened into `context.error`.
    pub fn error(&self, message: &str, error: Option<&ErrorInfo>, context: Option<Context>) {
        let context = match error {
            Some(error) => {
                let mut context = context.unwrap_or_default();
                context.insert("error".to_string(), error.to_value());
                Some(context)
            }
            None => context,
        };
        self.log(LogLevel::Error, message, context);
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level >= self.config.min_level
    }

    fn log(&self, level: LogLevel, message: &str, context: Option<Context>) {
        if !self.should_log(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            timestamp: Utc::now(),
            context,
        };
        metrics::record_log_entry(level);

        if self.config.enable_console {
            if let Err(e) = self.console.emit(&entry) {
                tracing::warn!(sink = "console", error = %e, "Log sink rejected entry");
            }
        }

        if self.config.enable_remote {
            if let Err(e) = self.remote.emit(&entry) {
                tracing::warn!(sink = "remote", error = %e, "Log sink rejected entry");
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("config", &self.config).finish()
    }
}
