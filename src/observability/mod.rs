//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline events:
//!     → logger.rs (level filter → console sink, remote sink)
//! Pipeline failures:
//!     → reporter.rs (enabled? sampled? → logger.error → report sink)
//! Both:
//!     → metrics.rs (counters, Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Logger and reporter are explicit values injected into the pipeline
//! - Sinks never fail the caller
//! - Sampling randomness is injectable for deterministic tests

pub mod logger;
pub mod metrics;
pub mod reporter;
pub mod sampling;
pub mod sink;

pub use logger::{Context, ErrorInfo, LogEntry, LogLevel, Logger};
pub use reporter::{ErrorReport, ErrorReporter, ReportOutcome, Severity};
pub use sampling::{FixedRandom, RandomSource, ThreadRandom};
pub use sink::{HttpSink, LogSink, MemorySink, NullSink, ReportSink, SinkError, TracingSink};
