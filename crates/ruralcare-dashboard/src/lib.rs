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
#![allow(clippy::module_name_repetitions)]

//! Data coordination for the RuralCare health-monitoring dashboard.
//!
//! Layout:
//! - `config.rs`: endpoint, limits, alert cadence, location policy
//! - `error.rs`: typed error taxonomy surfaced to users
//! - `api/`: backend contract (`DashboardApi`) and its `reqwest` implementation
//! - `coordinator.rs`: refresh cycle and report submission
//! - `state.rs`: data snapshot, view state, report form, notices
//! - `projection.rs`: pure display mapping
//! - `location.rs`: location resolution for submitted reports
//! - `alerts.rs`: pluggable alert source and the rolling alert feed

pub mod alerts;
pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod projection;
pub mod state;

pub use alerts::{Alert, AlertFeed, AlertLog, AlertSource, MockAlertSource};
pub use api::{DashboardApi, HttpDashboardApi};
pub use config::{DashboardConfig, LocationPolicy};
pub use coordinator::DashboardCoordinator;
pub use error::{DashboardError, DashboardResult, ErrorKind};
pub use location::{JitterResolver, LocationResolver, StrictResolver};
pub use state::{DashboardData, Notice, NoticeKind, ReportForm, ViewState, ViewTab};
