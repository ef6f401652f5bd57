//! Output sinks for log entries and error reports.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::observability::logger::{LogEntry, LogLevel};
use crate::observability::reporter::ErrorReport;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid sink endpoint: {0}")]
    Endpoint(String),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no async runtime available for delivery")]
    NoRuntime,

    #[error("sink transport error: {0}")]
    Transport(String),

    #[error("sink state poisoned")]
    Poisoned,
}

/// Destination for log entries. Must not panic; errors are swallowed by the
/// logger.
pub trait LogSink: Send + Sync {
    fn emit(&self, entry: &LogEntry) -> Result<(), SinkError>;
}

/// Destination for sampled error reports.
pub trait ReportSink: Send + Sync {
    fn send(&self, report: &ErrorReport) -> Result<(), SinkError>;
}

/// Console sink writing through `tracing`, one macro per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry) -> Result<(), SinkError> {
        let context = match &entry.context {
            Some(context) => serde_json::to_string(context)?,
            None => String::new(),
        };
        let tag = entry.level.tag();
        match entry.level {
            LogLevel::Debug => tracing::debug!(context = %context, "{} {}", tag, entry.message),
            LogLevel::Info => tracing::info!(context = %context, "{} {}", tag, entry.message),
            LogLevel::Warn => tracing::warn!(context = %context, "{} {}", tag, entry.message),
            LogLevel::Error => tracing::error!(context = %context, "{} {}", tag, entry.message),
        }
        Ok(())
    }
}

/// Sink that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, _entry: &LogEntry) -> Result<(), SinkError> {
        Ok(())
    }
}

impl ReportSink for NullSink {
    fn send(&self, _report: &ErrorReport) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Fire-and-forget JSON POST to a collector endpoint.
///
/// Delivery runs on the current tokio runtime; the caller only learns about
/// failures that happen before the request is spawned.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSink {
    pub fn new(endpoint: &str) -> Result<Self, SinkError> {
        let endpoint = Url::parse(endpoint).map_err(|e| SinkError::Endpoint(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn forward<T: Serialize>(&self, payload: &T) -> Result<(), SinkError> {
        let body = serde_json::to_value(payload)?;
        let handle = tokio::runtime::Handle::try_current().map_err(|_| SinkError::NoRuntime)?;
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        handle.spawn(async move {
            match client.post(endpoint.clone()).json(&body).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(endpoint = %endpoint, status = %resp.status(), "Collector rejected payload");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Collector unreachable");
                }
            }
        });
        Ok(())
    }
}

impl LogSink for HttpSink {
    fn emit(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.forward(entry)
    }
}

impl ReportSink for HttpSink {
    fn send(&self, report: &ErrorReport) -> Result<(), SinkError> {
        self.forward(report)
    }
}

/// In-memory sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
    reports: Mutex<Vec<ErrorReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.entries
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(entry.clone());
        Ok(())
    }
}

impl ReportSink for MemorySink {
    fn send(&self, report: &ErrorReport) -> Result<(), SinkError> {
        self.reports
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(report.clone());
        Ok(())
    }
}
