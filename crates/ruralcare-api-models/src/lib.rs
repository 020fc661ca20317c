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
//! Shared HTTP DTOs for the RuralCare health-monitoring API.
//!
//! These types describe the JSON exchanged with the backend under `/api`. The
//! dashboard client and the CLI both decode through them so the contract stays
//! in one place. Enum fields tolerate values this client does not know about
//! (they decode to an `Unknown` variant) so a single unexpected string never
//! fails a whole refresh cycle.

pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on failed requests (`{"detail": ...}`).
///
/// `detail` is free-form: a string for handler errors, or a list of
/// validation entries for rejected payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Diagnostic payload supplied by the server.
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Flatten the detail payload into a single human-readable line.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    entry
                        .get("msg")
                        .and_then(serde_json::Value::as_str)
                        .map_or_else(|| entry.to_string(), str::to_string)
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

/// Aggregate counters shown on the dashboard landing view.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardStats {
    /// Total number of health reports on record.
    pub total_reports: u64,
    /// Reports whose status is still active.
    pub active_cases: u64,
    /// High/critical reports raised recently.
    pub alerts: u64,
    /// Average TDS value across water samples.
    pub water_quality_average: f64,
    /// Doctors listed in the directory.
    pub doctors_available: u64,
    /// Stock items currently classified as critical.
    pub critical_stocks: u64,
}

/// Coordinates plus a free-form address.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub lng: f64,
    /// Human-readable address, when one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl GeoPoint {
    /// Address text, if present and not blank.
    #[must_use]
    pub fn address_text(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Category of an incoming health report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Suspected disease or symptoms.
    Disease,
    /// Complaint about water supply quality.
    WaterQuality,
    /// General complaint.
    Complaint,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl ReportType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::WaterQuality => "water_quality",
            Self::Complaint => "complaint",
            Self::Unknown => "unknown",
        }
    }
}

/// Ordinal urgency classification of a health report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine.
    Low,
    /// Needs follow-up.
    Medium,
    /// Needs prompt attention.
    High,
    /// Needs immediate intervention.
    Critical,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

/// Lifecycle status of a health report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Open case.
    Active,
    /// Closed case.
    Resolved,
    /// Being investigated by field staff.
    UnderInvestigation,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl ReportStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::UnderInvestigation => "under_investigation",
            Self::Unknown => "unknown",
        }
    }
}

/// Safety classification derived from water-quality measurements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WaterStatus {
    /// Within all thresholds.
    Safe,
    /// Elevated TDS or turbidity.
    Moderate,
    /// Outside drinking thresholds.
    Unsafe,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl WaterStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Unsafe => "unsafe",
            Self::Unknown => "unknown",
        }
    }
}

/// Inventory-level classification for a medical supply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Sufficient quantity on hand.
    Adequate,
    /// Running low.
    Low,
    /// Nearly exhausted.
    Critical,
    /// Nothing left.
    OutOfStock,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl StockStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adequate => "adequate",
            Self::Low => "low",
            Self::Critical => "critical",
            Self::OutOfStock => "out_of_stock",
            Self::Unknown => "unknown",
        }
    }
}

/// Health incident report as returned by the backend.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    /// Server-assigned identifier.
    pub id: String,
    /// Server-assigned reporter identifier.
    #[serde(default)]
    pub reporter_id: Option<String>,
    /// Name entered by the reporter (may be blank when anonymous).
    #[serde(default)]
    pub reporter_name: String,
    /// Whether the reporter asked to stay anonymous.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Report category.
    pub report_type: ReportType,
    /// Free-text symptom description.
    pub symptoms: String,
    /// Urgency.
    pub severity: Severity,
    /// Where the incident was observed.
    #[serde(default)]
    pub location: GeoPoint,
    /// When the report was filed.
    #[serde(with = "timestamp")]
    pub date_reported: DateTime<Utc>,
    /// Case status.
    pub status: ReportStatus,
    /// Optional extra notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Payload for `POST /reports`; the server assigns id, date and status.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReportCreate {
    /// Reporter name (blank when anonymous).
    pub reporter_name: String,
    /// Report category.
    pub report_type: ReportType,
    /// Free-text symptom description.
    pub symptoms: String,
    /// Urgency.
    pub severity: Severity,
    /// Resolved location.
    pub location: GeoPoint,
    /// Whether the reporter asked to stay anonymous.
    pub is_anonymous: bool,
    /// Optional extra notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Water-quality sample.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterQualitySample {
    /// Server-assigned identifier.
    pub id: String,
    /// Sampling site.
    #[serde(default)]
    pub location: GeoPoint,
    /// Total dissolved solids (ppm).
    pub tds_value: f64,
    /// pH level.
    pub ph_level: f64,
    /// Turbidity (NTU).
    pub turbidity: f64,
    /// Residual chlorine (mg/L).
    pub chlorine_level: f64,
    /// Server-derived safety classification.
    pub status: WaterStatus,
    /// When the sample was tested.
    #[serde(with = "timestamp")]
    pub test_date: DateTime<Utc>,
    /// Who ran the test.
    pub tested_by: String,
}

/// Payload for `POST /water-quality`; the server derives the status.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterQualitySampleCreate {
    /// Sampling site.
    pub location: GeoPoint,
    /// Total dissolved solids (ppm).
    pub tds_value: f64,
    /// pH level.
    pub ph_level: f64,
    /// Turbidity (NTU).
    pub turbidity: f64,
    /// Residual chlorine (mg/L).
    pub chlorine_level: f64,
    /// Who ran the test.
    pub tested_by: String,
}

/// Doctor directory entry.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Server-assigned identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Medical specialization.
    pub specialization: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Availability window (e.g. `24/7`, `9AM-6PM`).
    pub availability: String,
    /// Clinic the doctor practices at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    /// Practice location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

/// Payload for `POST /doctors`.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorCreate {
    /// Full name.
    pub name: String,
    /// Medical specialization.
    pub specialization: String,
    /// Practice location.
    pub location: GeoPoint,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Availability window.
    pub availability: String,
    /// Clinic the doctor practices at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
}

/// Medical supply inventory line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalStockItem {
    /// Server-assigned identifier.
    pub id: String,
    /// Item name.
    pub item_name: String,
    /// Units on hand; the backend does not reject negative counts.
    pub quantity: i64,
    /// Unit of measure.
    pub unit: String,
    /// Server-reported inventory classification.
    pub status: StockStatus,
    /// Storage location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Expiry date of the current batch.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Last inventory update.
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Payload for `POST /medical-stock`; the server derives the status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalStockCreate {
    /// Item name.
    pub item_name: String,
    /// Units on hand.
    pub quantity: i64,
    /// Unit of measure.
    pub unit: String,
    /// Storage location.
    pub location: GeoPoint,
    /// Expiry date of the current batch.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Role a registered user acts in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Member of the public filing reports.
    Citizen,
    /// Practising doctor.
    Doctor,
    /// Clinic or health-centre staff.
    ClinicStaff,
    /// Government health official.
    Government,
    /// Value not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Doctor => "doctor",
            Self::ClinicStaff => "clinic_staff",
            Self::Government => "government",
            Self::Unknown => "unknown",
        }
    }
}

/// Registered platform user.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role on the platform.
    pub role: UserRole,
    /// Home location.
    #[serde(default)]
    pub location: GeoPoint,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Registration time.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /users`.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserCreate {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role on the platform.
    pub role: UserRole,
    /// Home location.
    pub location: GeoPoint,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
