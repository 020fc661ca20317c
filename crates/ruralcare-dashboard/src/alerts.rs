//! Rolling alert feed.
//!
//! Alerts come from an [`AlertSource`]; [`MockAlertSource`] simulates field
//! alerts until a real push channel exists. [`AlertFeed`] polls the source on a
//! fixed period and keeps only the newest few alerts.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ruralcare_api_models::Severity;
use ruralcare_telemetry::Metrics;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DashboardResult;

/// A single entry in the alert feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// Urgency.
    pub severity: Severity,
    /// Headline.
    pub title: String,
    /// Affected village or district.
    pub location: String,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}

/// Producer of alerts for the feed.
#[async_trait]
pub trait AlertSource: Send {
    /// Produce the next alert.
    ///
    /// # Errors
    ///
    /// Implementations return an error when no alert could be obtained; the
    /// feed logs it and waits for the next period.
    async fn next_alert(&mut self) -> DashboardResult<Alert>;
}

const MOCK_TITLES: [&str; 6] = [
    "Fever cluster reported",
    "Unsafe water sample",
    "ORS stock running low",
    "Suspected cholera case",
    "Dengue symptoms reported",
    "Clinic without a doctor on duty",
];

const MOCK_LOCATIONS: [&str; 6] = [
    "Sisana",
    "Kheri Kalan",
    "Bawana",
    "Narela",
    "Alipur",
    "Ghoga",
];

const MOCK_SEVERITIES: [Severity; 3] = [Severity::Medium, Severity::High, Severity::Critical];

/// Randomised alert generator.
pub struct MockAlertSource {
    rng: StdRng,
}

impl MockAlertSource {
    /// Source seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic source.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }
}

impl Default for MockAlertSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSource for MockAlertSource {
    async fn next_alert(&mut self) -> DashboardResult<Alert> {
        Ok(Alert {
            id: Uuid::new_v4(),
            severity: self.pick(&MOCK_SEVERITIES),
            title: self.pick(&MOCK_TITLES).to_string(),
            location: self.pick(&MOCK_LOCATIONS).to_string(),
            raised_at: Utc::now(),
        })
    }
}

/// Bounded, newest-first alert history.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    /// Empty log retaining at most `capacity` alerts (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert an alert, evicting the oldest when full.
    pub fn push(&mut self, alert: Alert) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(alert);
    }

    /// Alerts, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<Alert> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no alert has been retained yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Background task feeding an [`AlertLog`] from an [`AlertSource`].
///
/// The task is aborted on [`AlertFeed::shutdown`] or when the feed is dropped.
pub struct AlertFeed {
    log: Arc<Mutex<AlertLog>>,
    task: Option<JoinHandle<()>>,
}

impl AlertFeed {
    /// Start polling `source` every `period`, first tick one period from now.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn<S>(
        mut source: S,
        period: Duration,
        capacity: usize,
        metrics: Option<Metrics>,
    ) -> Self
    where
        S: AlertSource + 'static,
    {
        let log = Arc::new(Mutex::new(AlertLog::new(capacity)));
        let sink = Arc::clone(&log);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match source.next_alert().await {
                    Ok(alert) => {
                        debug!(
                            alert_id = %alert.id,
                            severity = alert.severity.as_str(),
                            location = %alert.location,
                            "alert raised"
                        );
                        sink.lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(alert);
                        if let Some(metrics) = &metrics {
                            metrics.inc_alert();
                        }
                    }
                    Err(err) => {
                        warn!(error = %err.detail(), "alert source failed; skipping tick");
                    }
                }
            }
        });
        Self {
            log,
            task: Some(task),
        }
    }

    /// Alerts currently retained, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<Alert> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recent()
    }

    /// Whether the background task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the background task and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(err) = task.await
                && !err.is_cancelled()
            {
                warn!(error = %err, "alert feed task ended abnormally");
            }
        }
    }
}

impl Drop for AlertFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
