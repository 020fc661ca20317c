//! Dashboard configuration.
//!
//! The only externally required value is the backend base URL; everything else
//! has a default matching the deployed dashboard (15-item lists, 15 s alert
//! cadence, five rolling alerts).

use std::time::Duration;

use url::Url;

use crate::error::{DashboardError, DashboardResult};

/// Default HTTP timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default number of reports fetched per refresh cycle.
pub const DEFAULT_REPORT_LIMIT: u32 = 15;
/// Default number of water samples fetched per refresh cycle.
pub const DEFAULT_WATER_LIMIT: u32 = 15;
/// Default alert generation period.
pub const DEFAULT_ALERT_PERIOD: Duration = Duration::from_secs(15);
/// Default size of the rolling alert list.
pub const DEFAULT_ALERT_CAPACITY: usize = 5;

const API_PREFIX: &str = "api";

/// How a submitted report obtains its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationPolicy {
    /// Jitter a fixed reference point when the reporter gives no coordinates.
    #[default]
    Jitter,
    /// Reject reports that do not carry explicit coordinates.
    Strict,
}

/// Settings consumed by the coordinator, HTTP client and alert feed.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL; `/api` is appended unless already present.
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `limit` query for `/reports`.
    pub report_limit: u32,
    /// `limit` query for `/water-quality`.
    pub water_limit: u32,
    /// Interval between generated alerts.
    pub alert_period: Duration,
    /// Number of most recent alerts retained.
    pub alert_capacity: usize,
    /// Location resolution policy for report submission.
    pub location_policy: LocationPolicy,
}

impl DashboardConfig {
    /// Build a configuration for the given backend with default tuning.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            report_limit: DEFAULT_REPORT_LIMIT,
            water_limit: DEFAULT_WATER_LIMIT,
            alert_period: DEFAULT_ALERT_PERIOD,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            location_policy: LocationPolicy::Jitter,
        }
    }

    /// Parse a base URL string and build a default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] when the URL cannot be parsed or is
    /// not HTTP(S).
    pub fn from_url(raw: &str) -> DashboardResult<Self> {
        let api_url = Url::parse(raw.trim()).map_err(|err| DashboardError::Config {
            field: "api_url",
            message: format!("invalid URL '{raw}': {err}"),
        })?;
        let config = Self::new(api_url);
        config.validate()?;
        Ok(config)
    }

    /// Check the values that would otherwise fail at request time.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] naming the offending field.
    pub fn validate(&self) -> DashboardResult<()> {
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(DashboardError::Config {
                field: "api_url",
                message: format!("unsupported scheme '{}'", self.api_url.scheme()),
            });
        }
        if self.timeout.is_zero() {
            return Err(DashboardError::Config {
                field: "timeout",
                message: "timeout must be positive".into(),
            });
        }
        if self.alert_period.is_zero() {
            return Err(DashboardError::Config {
                field: "alert_period",
                message: "alert period must be positive".into(),
            });
        }
        if self.alert_capacity == 0 {
            return Err(DashboardError::Config {
                field: "alert_capacity",
                message: "alert capacity must be at least one".into(),
            });
        }
        Ok(())
    }

    /// Root URL that endpoint paths are joined onto, always ending in `/api/`.
    #[must_use]
    pub fn api_root(&self) -> Url {
        let mut root = self.api_url.clone();
        root.set_query(None);
        root.set_fragment(None);
        let trimmed = root.path().trim_end_matches('/').to_string();
        let path = if trimmed.rsplit('/').next() == Some(API_PREFIX) {
            format!("{trimmed}/")
        } else {
            format!("{trimmed}/{API_PREFIX}/")
        };
        root.set_path(&path);
        root
    }
}
