#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Telemetry primitives shared across the RuralCare workspace.
//!
//! Centralises logging setup and the Prometheus counters describing refresh and
//! submission cycles so the library and the CLI report the same story.

pub mod init;
pub mod metrics;

pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging,
};
pub use metrics::{CycleOutcome, Metrics, MetricsSnapshot};
