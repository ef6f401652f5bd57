//! Severity-classified error reporting on top of the [`Logger`].
//!
//! # Flow
//! ```text
//! report(error, severity, context)
//!     → disabled?            → no-op
//!     → sample draw ≥ rate?  → no-op
//!     → ErrorReport { timestamp, session_id, user_id (read from LocalStore) }
//!     → logger.error(...)
//!     → ReportSink::send     (only when a DSN is configured)
//! ```
//!
//! Logging and forwarding share one sampling decision.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::schema::{Environment, ErrorReportingConfig};
use crate::observability::logger::{Context, ErrorInfo, Logger};
use crate::observability::metrics;
use crate::observability::sampling::{should_sample, RandomSource, ThreadRandom};
use crate::observability::sink::{HttpSink, ReportSink};
use crate::storage::{LocalStore, USER_ID_KEY};

const SESSION_ID_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Error importance, ordered `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured failure handed to the report sink.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub environment: Environment,
}

/// What happened to a single `report` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Reporting is disabled; nothing was logged.
    Disabled,
    /// Dropped by sampling; nothing was logged.
    Sampled,
    /// Logged locally; no DSN configured or the sink refused it.
    Logged,
    /// Logged locally and handed to the report sink.
    Forwarded,
}

pub struct ErrorReporter {
    config: ErrorReportingConfig,
    session_id: String,
    logger: Arc<Logger>,
    store: Arc<dyn LocalStore>,
    random: Arc<dyn RandomSource>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl ErrorReporter {
    /// Build a reporter with a fresh session ID. Reports are posted to the
    /// DSN when one is configured.
    pub fn new(
        config: ErrorReportingConfig,
        logger: Arc<Logger>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        let sink = config.dsn.as_deref().and_then(|dsn| match HttpSink::new(dsn) {
            Ok(sink) => Some(Arc::new(sink) as Arc<dyn ReportSink>),
            Err(e) => {
                tracing::warn!(dsn = %dsn, error = %e, "Error report forwarding disabled");
                None
            }
        });

        Self {
            config,
            session_id: generate_session_id(),
            logger,
            store,
            random: Arc::new(ThreadRandom),
            sink,
        }
    }

    /// Replace the sampling source.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Replace the report transport. Forwarding still requires a DSN.
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ErrorReportingConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn report(
        &self,
        error: impl Into<ErrorInfo>,
        severity: Severity,
        context: Option<Context>,
    ) -> ReportOutcome {
        if !self.config.enabled {
            return ReportOutcome::Disabled;
        }

        if !should_sample(self.random.as_ref(), self.config.sample_rate) {
            metrics::record_error_report(severity, "sampled");
            return ReportOutcome::Sampled;
        }

        let error = error.into();
        let report = ErrorReport {
            message: error.message.clone(),
            stack: error.stack.clone(),
            severity,
            context: context.clone(),
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
            user_id: self.user_id(),
            environment: self.config.environment,
        };

        self.logger.error(&report.message, Some(&error), context);

        let outcome = match (&self.config.dsn, &self.sink) {
            (Some(_), Some(sink)) => match sink.send(&report) {
                Ok(()) => ReportOutcome::Forwarded,
                Err(e) => {
                    tracing::warn!(error = %e, "Error report sink failed");
                    ReportOutcome::Logged
                }
            },
            _ => ReportOutcome::Logged,
        };

        metrics::record_error_report(
            severity,
            if outcome == ReportOutcome::Forwarded {
                "forwarded"
            } else {
                "logged"
            },
        );
        outcome
    }

    pub fn report_critical(
        &self,
        error: impl Into<ErrorInfo>,
        context: Option<Context>,
    ) -> ReportOutcome {
        self.report(error, Severity::Critical, context)
    }

    /// Persist the user ID attached to later reports.
    pub fn set_user_id(&self, user_id: &str) {
        self.store.set(USER_ID_KEY, user_id);
    }

    /// Read at report time; never cached.
    pub fn user_id(&self) -> Option<String> {
        self.store.get(USER_ID_KEY).filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("config", &self.config)
            .field("session_id", &self.session_id)
            .finish()
    }
}

fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_ID_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
