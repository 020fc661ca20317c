//! Refresh cycle and report submission.
//!
//! The coordinator owns the displayed [`DashboardData`], the [`ViewState`] and
//! the pending notices. A refresh either replaces all five collections or
//! leaves them untouched; there is no partial update.

use std::time::Instant;

use ruralcare_api_models::{HealthReport, HealthReportCreate};
use ruralcare_telemetry::{CycleOutcome, Metrics};
use tracing::{info, warn};

use crate::api::DashboardApi;
use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::location::{LocationResolver, resolver_for};
use crate::state::{DashboardData, Notice, ReportForm, ViewState};

/// Drives data loading and report submission against a [`DashboardApi`].
pub struct DashboardCoordinator<A>
where
    A: DashboardApi,
{
    api: A,
    report_limit: u32,
    water_limit: u32,
    resolver: Box<dyn LocationResolver>,
    data: DashboardData,
    view: ViewState,
    notices: Vec<Notice>,
    metrics: Option<Metrics>,
    refresh_attempts: u64,
}

impl<A> DashboardCoordinator<A>
where
    A: DashboardApi,
{
    /// Build a coordinator with empty data and the configured location policy.
    #[must_use]
    pub fn new(api: A, config: &DashboardConfig) -> Self {
        Self {
            api,
            report_limit: config.report_limit,
            water_limit: config.water_limit,
            resolver: resolver_for(config.location_policy),
            data: DashboardData::default(),
            view: ViewState::default(),
            notices: Vec::new(),
            metrics: None,
            refresh_attempts: 0,
        }
    }

    /// Replace the location resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn LocationResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Record refresh and submission outcomes in the given registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Backend handle.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Most recent successfully loaded data.
    #[must_use]
    pub const fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Current view state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable view state for navigation and toggles.
    pub const fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Notices raised since the last [`Self::take_notices`].
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Number of refresh cycles started so far.
    #[must_use]
    pub const fn refresh_attempts(&self) -> u64 {
        self.refresh_attempts
    }

    /// Fetch all five collections concurrently and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and exactly one
    /// [`crate::NoticeKind::LoadFailed`] notice is raised for the cycle.
    ///
    /// # Errors
    ///
    /// Returns the first backend failure observed in the cycle.
    pub async fn load_all(&mut self) -> DashboardResult<()> {
        self.refresh_attempts += 1;
        self.view.loading = true;
        let started = Instant::now();

        let fetched = tokio::try_join!(
            self.api.fetch_stats(),
            self.api.fetch_reports(self.report_limit),
            self.api.fetch_water_quality(self.water_limit),
            self.api.fetch_doctors(),
            self.api.fetch_medical_stock(),
        );
        self.view.loading = false;

        match fetched {
            Ok((stats, reports, water_quality, doctors, medical_stock)) => {
                self.data = DashboardData {
                    stats,
                    reports,
                    water_quality,
                    doctors,
                    medical_stock,
                };
                self.record_refresh(CycleOutcome::Success, started);
                info!(
                    cycle = self.refresh_attempts,
                    reports = self.data.reports.len(),
                    water_samples = self.data.water_quality.len(),
                    doctors = self.data.doctors.len(),
                    stock_items = self.data.medical_stock.len(),
                    "dashboard data refreshed"
                );
                Ok(())
            }
            Err(err) => {
                self.record_refresh(CycleOutcome::Failure, started);
                warn!(
                    cycle = self.refresh_attempts,
                    kind = err.kind().as_str(),
                    error = %err.detail(),
                    "dashboard refresh failed; keeping previous data"
                );
                self.notices.push(Notice::load_failed(&err));
                Err(err)
            }
        }
    }

    /// Re-run the refresh cycle.
    ///
    /// # Errors
    ///
    /// See [`Self::load_all`].
    pub async fn refresh(&mut self) -> DashboardResult<()> {
        self.load_all().await
    }

    /// Submit the form currently open in the view, opening a blank one if none is.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_report`].
    pub async fn submit_open_form(&mut self) -> DashboardResult<HealthReport> {
        let form = self.view.open_report_form().clone();
        self.submit_report(form).await
    }

    /// Validate, resolve location and create a report.
    ///
    /// On success the form is closed and exactly one refresh cycle follows; a
    /// failure of that refresh is surfaced as a load notice, not as a failed
    /// submission. On failure the form stays open with its entries and no
    /// refresh is triggered.
    ///
    /// # Errors
    ///
    /// Returns validation, location or backend errors from the submission.
    pub async fn submit_report(&mut self, form: ReportForm) -> DashboardResult<HealthReport> {
        let created = match self.create_from(&form).await {
            Ok(report) => report,
            Err(err) => {
                self.record_submission(CycleOutcome::Failure);
                warn!(
                    kind = err.kind().as_str(),
                    error = %err.detail(),
                    "report submission failed"
                );
                self.notices.push(Notice::submit_failed(&err));
                self.view.report_form = Some(form);
                return Err(err);
            }
        };

        self.record_submission(CycleOutcome::Success);
        info!(
            report_id = %created.id,
            severity = created.severity.as_str(),
            "report submitted"
        );
        self.view.close_report_form();
        if self.load_all().await.is_err() {
            warn!(report_id = %created.id, "refresh after submission failed");
        }
        Ok(created)
    }

    async fn create_from(&self, form: &ReportForm) -> DashboardResult<HealthReport> {
        form.validate()?;
        let location = self.resolver.resolve(form)?;
        let payload = HealthReportCreate {
            reporter_name: if form.is_anonymous {
                String::new()
            } else {
                form.reporter_name.trim().to_string()
            },
            report_type: form.report_type,
            symptoms: form.symptoms.trim().to_string(),
            severity: form.severity,
            location,
            is_anonymous: form.is_anonymous,
            additional_info: form.notes().map(str::to_string),
        };
        self.api.create_report(&payload).await
    }

    fn record_refresh(&self, outcome: CycleOutcome, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_refresh(outcome, started.elapsed());
        }
    }

    fn record_submission(&self, outcome: CycleOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_submission(outcome);
        }
    }
}
