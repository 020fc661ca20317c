//! Backend contract consumed by the coordinator.
//!
//! The coordinator only depends on [`DashboardApi`]; [`HttpDashboardApi`] is the
//! production implementation and tests substitute in-memory fakes.

mod http;

use async_trait::async_trait;
use ruralcare_api_models::{
    DashboardStats, Doctor, DoctorCreate, HealthReport, HealthReportCreate, MedicalStockCreate,
    MedicalStockItem, User, UserCreate, WaterQualitySample, WaterQualitySampleCreate,
};

use crate::error::{DashboardError, DashboardResult};

pub use http::HttpDashboardApi;

/// Read and write operations exposed by the health-monitoring backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /dashboard/stats`.
    async fn fetch_stats(&self) -> DashboardResult<DashboardStats>;

    /// `GET /reports?limit=N`, newest first.
    async fn fetch_reports(&self, limit: u32) -> DashboardResult<Vec<HealthReport>>;

    /// `GET /water-quality?limit=N`, newest first.
    async fn fetch_water_quality(&self, limit: u32) -> DashboardResult<Vec<WaterQualitySample>>;

    /// `GET /doctors`.
    async fn fetch_doctors(&self) -> DashboardResult<Vec<Doctor>>;

    /// `GET /medical-stock`.
    async fn fetch_medical_stock(&self) -> DashboardResult<Vec<MedicalStockItem>>;

    /// `POST /reports`.
    async fn create_report(&self, report: &HealthReportCreate) -> DashboardResult<HealthReport>;

    /// `GET /reports/{id}`; default implementation reports lack of support.
    async fn fetch_report(&self, id: &str) -> DashboardResult<HealthReport> {
        let _ = id;
        Err(DashboardError::Unsupported {
            operation: "reports.get",
        })
    }

    /// `POST /water-quality`; default implementation reports lack of support.
    async fn create_water_sample(
        &self,
        sample: &WaterQualitySampleCreate,
    ) -> DashboardResult<WaterQualitySample> {
        let _ = sample;
        Err(DashboardError::Unsupported {
            operation: "water_quality.create",
        })
    }

    /// `POST /doctors`; default implementation reports lack of support.
    async fn create_doctor(&self, doctor: &DoctorCreate) -> DashboardResult<Doctor> {
        let _ = doctor;
        Err(DashboardError::Unsupported {
            operation: "doctors.create",
        })
    }

    /// `POST /medical-stock`; default implementation reports lack of support.
    async fn create_stock_item(
        &self,
        item: &MedicalStockCreate,
    ) -> DashboardResult<MedicalStockItem> {
        let _ = item;
        Err(DashboardError::Unsupported {
            operation: "medical_stock.create",
        })
    }

    /// `GET /users`; default implementation reports lack of support.
    async fn fetch_users(&self) -> DashboardResult<Vec<User>> {
        Err(DashboardError::Unsupported {
            operation: "users.list",
        })
    }

    /// `POST /users`; default implementation reports lack of support.
    async fn create_user(&self, user: &UserCreate) -> DashboardResult<User> {
        let _ = user;
        Err(DashboardError::Unsupported {
            operation: "users.create",
        })
    }
}
