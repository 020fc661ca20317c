//! Data snapshot, view state and the report form owned by the coordinator.

use std::fmt;
use std::str::FromStr;

use ruralcare_api_models::{
    DashboardStats, Doctor, HealthReport, MedicalStockItem, ReportType, Severity,
    WaterQualitySample,
};

use crate::error::{DashboardError, DashboardResult, ErrorKind};

/// The five collections produced by one refresh cycle.
///
/// Replaced wholesale on every successful cycle; never patched by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// Aggregate counters, as returned by the backend.
    pub stats: DashboardStats,
    /// Recent health reports.
    pub reports: Vec<HealthReport>,
    /// Recent water-quality samples.
    pub water_quality: Vec<WaterQualitySample>,
    /// Doctor directory.
    pub doctors: Vec<Doctor>,
    /// Medical stock levels.
    pub medical_stock: Vec<MedicalStockItem>,
}

/// Views reachable from the navigation sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewTab {
    /// Landing view with counters and recent activity.
    #[default]
    Dashboard,
    /// Health report list.
    Reports,
    /// Water-quality samples.
    WaterQuality,
    /// Doctor directory.
    Doctors,
    /// Medical stock levels.
    Stock,
    /// Client settings.
    Settings,
}

impl ViewTab {
    /// All tabs in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Reports,
        Self::WaterQuality,
        Self::Doctors,
        Self::Stock,
        Self::Settings,
    ];

    /// Stable identifier used in navigation.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Reports => "reports",
            Self::WaterQuality => "water-quality",
            Self::Doctors => "doctors",
            Self::Stock => "stock",
            Self::Settings => "settings",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Reports => "Health Reports",
            Self::WaterQuality => "Water Quality",
            Self::Doctors => "Doctor Directory",
            Self::Stock => "Medical Stock",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ViewTab {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.id() == value.trim())
            .ok_or_else(|| DashboardError::validation("tab", format!("unknown view '{value}'")))
    }
}

/// Entries of the report-submission form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportForm {
    /// Reporter name; may be blank when anonymous.
    pub reporter_name: String,
    /// Report category.
    pub report_type: ReportType,
    /// Symptom description.
    pub symptoms: String,
    /// Urgency.
    pub severity: Severity,
    /// Free-form address; blank means "not supplied".
    pub address: String,
    /// Explicit coordinates, when the reporter has them.
    pub coordinates: Option<(f64, f64)>,
    /// Stay anonymous.
    pub is_anonymous: bool,
    /// Extra notes.
    pub additional_info: String,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            reporter_name: String::new(),
            report_type: ReportType::Disease,
            symptoms: String::new(),
            severity: Severity::Low,
            address: String::new(),
            coordinates: None,
            is_anonymous: false,
            additional_info: String::new(),
        }
    }
}

impl ReportForm {
    /// Enforce the client-side required fields.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Validation`] naming the first missing field.
    pub fn validate(&self) -> DashboardResult<()> {
        if !self.is_anonymous && self.reporter_name.trim().is_empty() {
            return Err(DashboardError::validation(
                "reporter_name",
                "reporter name is required unless reporting anonymously",
            ));
        }
        if self.symptoms.trim().is_empty() {
            return Err(DashboardError::validation(
                "symptoms",
                "symptoms are required",
            ));
        }
        if self.severity == Severity::Unknown {
            return Err(DashboardError::validation("severity", "severity is required"));
        }
        if self.report_type == ReportType::Unknown {
            return Err(DashboardError::validation(
                "report_type",
                "report type is required",
            ));
        }
        if let Some((lat, lng)) = self.coordinates
            && (!(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng))
        {
            return Err(DashboardError::validation(
                "location",
                format!("coordinates ({lat}, {lng}) are out of range"),
            ));
        }
        Ok(())
    }

    /// Trimmed address, if one was supplied.
    #[must_use]
    pub fn address_text(&self) -> Option<&str> {
        let trimmed = self.address.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Trimmed notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        let trimmed = self.additional_info.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Toggles and modal visibility for the dashboard chrome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Currently displayed view.
    pub active_tab: ViewTab,
    /// Dark colour scheme.
    pub dark_mode: bool,
    /// Navigation sidebar expanded.
    pub sidebar_open: bool,
    /// Narrow layout; tab selection collapses the sidebar.
    pub compact_layout: bool,
    /// A refresh cycle is in flight.
    pub loading: bool,
    /// The submission dialog is open iff this is `Some`.
    pub report_form: Option<ReportForm>,
}

impl ViewState {
    /// Switch views; collapses the sidebar on compact layouts.
    pub const fn select_tab(&mut self, tab: ViewTab) {
        self.active_tab = tab;
        if self.compact_layout {
            self.sidebar_open = false;
        }
    }

    /// Flip the colour scheme.
    pub const fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Flip the sidebar.
    pub const fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Open the submission dialog with a blank form, keeping any form already open.
    pub fn open_report_form(&mut self) -> &mut ReportForm {
        self.report_form.get_or_insert_with(ReportForm::default)
    }

    /// Close the submission dialog, discarding its entries.
    pub fn close_report_form(&mut self) {
        self.report_form = None;
    }

    /// Whether the submission dialog is visible.
    #[must_use]
    pub const fn is_report_form_open(&self) -> bool {
        self.report_form.is_some()
    }
}

/// Which operation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A refresh cycle failed; stale data is still displayed.
    LoadFailed,
    /// A report submission failed; the form is still open.
    SubmitFailed,
}

/// User-visible failure notice (the toast/alert of the dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Operation that failed.
    pub kind: NoticeKind,
    /// Failure classification.
    pub category: ErrorKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    pub(crate) fn load_failed(err: &DashboardError) -> Self {
        Self {
            kind: NoticeKind::LoadFailed,
            category: err.kind(),
            message: format!(
                "Unable to load data. Please check your connection and try again. ({})",
                err.detail()
            ),
        }
    }

    pub(crate) fn submit_failed(err: &DashboardError) -> Self {
        let lead = match err.kind() {
            ErrorKind::Validation => "Please correct the report",
            ErrorKind::Network => "Unable to reach the server",
            ErrorKind::Server => "The server could not save the report",
        };
        Self {
            kind: NoticeKind::SubmitFailed,
            category: err.kind(),
            message: format!("{lead}: {}", err.detail()),
        }
    }
}
