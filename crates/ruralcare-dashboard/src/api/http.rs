//! `reqwest` implementation of [`DashboardApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use ruralcare_api_models::{
    DashboardStats, Doctor, DoctorCreate, ErrorBody, HealthReport, HealthReportCreate,
    MedicalStockCreate, MedicalStockItem, User, UserCreate, WaterQualitySample,
    WaterQualitySampleCreate,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::DashboardApi;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};

const USER_AGENT: &str = concat!("ruralcare-dashboard/", env!("CARGO_PKG_VERSION"));

/// HTTP client bound to a backend's `/api` root.
#[derive(Clone, Debug)]
pub struct HttpDashboardApi {
    client: Client,
    root: Url,
}

impl HttpDashboardApi {
    /// Build a client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| DashboardError::ClientBuild { source })?;
        Ok(Self::with_client(client, config))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            root: config.api_root(),
        }
    }

    /// Root every endpoint is resolved against.
    #[must_use]
    pub const fn root(&self) -> &Url {
        &self.root
    }

    fn endpoint(&self, operation: &'static str, path: &str) -> DashboardResult<Url> {
        self.root
            .join(path)
            .map_err(|source| DashboardError::Url { operation, source })
    }

    fn limited(&self, operation: &'static str, path: &str, limit: u32) -> DashboardResult<Url> {
        let mut url = self.endpoint(operation, path)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, operation: &'static str, url: Url) -> DashboardResult<T> {
        debug!(operation, url = %url, "dispatching GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DashboardError::Network { operation, source })?;
        decode(operation, response).await
    }

    async fn post<B, T>(&self, operation: &'static str, url: Url, body: &B) -> DashboardResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(operation, url = %url, "dispatching POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| DashboardError::Network { operation, source })?;
        decode(operation, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> DashboardResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|source| DashboardError::Decode { operation, source });
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .map(|body| body.message())
        .or_else(|| {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            (!text.is_empty()).then_some(text)
        });
    debug!(operation, status = status.as_u16(), "backend returned error status");
    Err(DashboardError::Server {
        operation,
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_stats(&self) -> DashboardResult<DashboardStats> {
        let url = self.endpoint("dashboard.stats", "dashboard/stats")?;
        self.get("dashboard.stats", url).await
    }

    async fn fetch_reports(&self, limit: u32) -> DashboardResult<Vec<HealthReport>> {
        let url = self.limited("reports.list", "reports", limit)?;
        self.get("reports.list", url).await
    }

    async fn fetch_water_quality(&self, limit: u32) -> DashboardResult<Vec<WaterQualitySample>> {
        let url = self.limited("water_quality.list", "water-quality", limit)?;
        self.get("water_quality.list", url).await
    }

    async fn fetch_doctors(&self) -> DashboardResult<Vec<Doctor>> {
        let url = self.endpoint("doctors.list", "doctors")?;
        self.get("doctors.list", url).await
    }

    async fn fetch_medical_stock(&self) -> DashboardResult<Vec<MedicalStockItem>> {
        let url = self.endpoint("medical_stock.list", "medical-stock")?;
        self.get("medical_stock.list", url).await
    }

    async fn create_report(&self, report: &HealthReportCreate) -> DashboardResult<HealthReport> {
        let url = self.endpoint("reports.create", "reports")?;
        self.post("reports.create", url, report).await
    }

    async fn fetch_report(&self, id: &str) -> DashboardResult<HealthReport> {
        let mut url = self.endpoint("reports.get", "reports/")?;
        url.path_segments_mut()
            .map_err(|()| DashboardError::Config {
                field: "api_url",
                message: "base URL cannot carry path segments".into(),
            })?
            .pop_if_empty()
            .push(id);
        self.get("reports.get", url).await
    }

    async fn create_water_sample(
        &self,
        sample: &WaterQualitySampleCreate,
    ) -> DashboardResult<WaterQualitySample> {
        let url = self.endpoint("water_quality.create", "water-quality")?;
        self.post("water_quality.create", url, sample).await
    }

    async fn create_doctor(&self, doctor: &DoctorCreate) -> DashboardResult<Doctor> {
        let url = self.endpoint("doctors.create", "doctors")?;
        self.post("doctors.create", url, doctor).await
    }

    async fn create_stock_item(
        &self,
        item: &MedicalStockCreate,
    ) -> DashboardResult<MedicalStockItem> {
        let url = self.endpoint("medical_stock.create", "medical-stock")?;
        self.post("medical_stock.create", url, item).await
    }

    async fn fetch_users(&self) -> DashboardResult<Vec<User>> {
        let url = self.endpoint("users.list", "users")?;
        self.get("users.list", url).await
    }

    async fn create_user(&self, user: &UserCreate) -> DashboardResult<User> {
        let url = self.endpoint("users.create", "users")?;
        self.post("users.create", url, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::Result;
    use httpmock::prelude::*;
    use ruralcare_api_models::{GeoPoint, ReportType, Severity, UserRole};
    use serde_json::json;

    fn api_for(server: &MockServer) -> Result<HttpDashboardApi> {
        let config = DashboardConfig::from_url(&server.base_url())?;
        Ok(HttpDashboardApi::new(&config)?)
    }

    #[tokio::test]
    async fn stats_are_fetched_from_api_prefix() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({
                "total_reports": 42,
                "active_cases": 7,
                "alerts": 3,
                "water_quality_average": 412.5,
                "doctors_available": 12,
                "critical_stocks": 2
            }));
        });

        let stats = api_for(&server)?.fetch_stats().await?;
        mock.assert();
        assert_eq!(stats.total_reports, 42);
        assert_eq!(stats.critical_stocks, 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_endpoints_send_limit_query() -> Result<()> {
        let server = MockServer::start_async().await;
        let reports = server.mock(|when, then| {
            when.method(GET)
                .path("/api/reports")
                .query_param("limit", "15");
            then.status(200).json_body(json!([]));
        });
        let water = server.mock(|when, then| {
            when.method(GET)
                .path("/api/water-quality")
                .query_param("limit", "5");
            then.status(200).json_body(json!([{
                "id": "w-1",
                "location": {"lat": 28.6, "lng": 77.2, "address": "Handpump 3"},
                "tds_value": 1200.0,
                "ph_level": 6.1,
                "turbidity": 6.0,
                "chlorine_level": 0.1,
                "status": "unsafe",
                "test_date": "2025-01-10T08:00:00",
                "tested_by": "PHC Lab"
            }]));
        });

        let api = api_for(&server)?;
        assert!(api.fetch_reports(15).await?.is_empty());
        let samples = api.fetch_water_quality(5).await?;
        reports.assert();
        water.assert();
        assert_eq!(samples.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn create_report_posts_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/reports")
                .json_body(json!({
                    "reporter_name": "",
                    "report_type": "disease",
                    "symptoms": "fever",
                    "severity": "high",
                    "location": {"lat": 28.7, "lng": 77.1, "address": "Rural Area, India"},
                    "is_anonymous": true
                }));
            then.status(200).json_body(json!({
                "id": "r-9",
                "reporter_id": "0d6c",
                "reporter_name": "",
                "report_type": "disease",
                "symptoms": "fever",
                "severity": "high",
                "location": {"lat": 28.7, "lng": 77.1, "address": "Rural Area, India"},
                "date_reported": "2025-01-10T08:00:00+00:00",
                "status": "active",
                "is_anonymous": true
            }));
        });

        let created = api_for(&server)?
            .create_report(&HealthReportCreate {
                reporter_name: String::new(),
                report_type: ReportType::Disease,
                symptoms: "fever".into(),
                severity: Severity::High,
                location: GeoPoint {
                    lat: 28.7,
                    lng: 77.1,
                    address: Some("Rural Area, India".into()),
                },
                is_anonymous: true,
                additional_info: None,
            })
            .await?;
        mock.assert();
        assert_eq!(created.id, "r-9");
        Ok(())
    }

    #[tokio::test]
    async fn error_statuses_are_classified() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/doctors");
            then.status(500)
                .json_body(json!({"detail": "Error fetching doctors: timeout"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/medical-stock");
            then.status(422).json_body(json!({
                "detail": [{"loc": ["body", "quantity"], "msg": "value is not a valid integer"}]
            }));
        });

        let api = api_for(&server)?;
        let Err(err) = api.fetch_doctors().await else {
            anyhow::bail!("expected server failure");
        };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(
            err.detail(),
            "doctors.list: Error fetching doctors: timeout (status 500)"
        );

        let Err(err) = api
            .create_stock_item(&MedicalStockCreate {
                item_name: "Paracetamol".into(),
                quantity: 0,
                unit: "strips".into(),
                location: GeoPoint::default(),
                expiry_date: None,
            })
            .await
        else {
            anyhow::bail!("expected validation failure");
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/medical-stock");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = api_for(&server)?
            .fetch_medical_stock()
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected decode failure"))?;
        assert!(matches!(err, DashboardError::Decode { .. }));
        assert_eq!(err.kind(), ErrorKind::Server);
        Ok(())
    }

    #[tokio::test]
    async fn single_report_is_fetched_by_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/reports/r-1");
            then.status(200).json_body(json!({
                "id": "r-1",
                "reporter_name": "Asha",
                "report_type": "complaint",
                "symptoms": "no chlorine",
                "severity": "medium",
                "location": {"lat": 0.0, "lng": 0.0},
                "date_reported": "2025-01-10T08:00:00Z",
                "status": "resolved"
            }));
        });

        let report = api_for(&server)?.fetch_report("r-1").await?;
        mock.assert();
        assert_eq!(report.report_type, ReportType::Complaint);
        Ok(())
    }

    #[tokio::test]
    async fn users_are_listed_and_registered() -> Result<()> {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(json!([{
                "id": "u-1",
                "name": "Sunita Devi",
                "email": "sunita@example.org",
                "role": "citizen",
                "location": {"lat": 25.3, "lng": 82.9, "address": "Varanasi"},
                "created_at": "2025-01-10T08:00:00"
            }]));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/users").json_body(json!({
                "name": "Dr. Khan",
                "email": "khan@example.org",
                "role": "doctor",
                "location": {"lat": 25.3, "lng": 82.9},
                "phone": "+91 90000 11111"
            }));
            then.status(200).json_body(json!({
                "id": "u-2",
                "name": "Dr. Khan",
                "email": "khan@example.org",
                "role": "doctor",
                "location": {"lat": 25.3, "lng": 82.9},
                "phone": "+91 90000 11111",
                "created_at": "2025-01-10T08:05:00Z"
            }));
        });

        let api = api_for(&server)?;
        let users = api.fetch_users().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, UserRole::Citizen);

        let created = api
            .create_user(&UserCreate {
                name: "Dr. Khan".into(),
                email: "khan@example.org".into(),
                role: UserRole::Doctor,
                location: GeoPoint {
                    lat: 25.3,
                    lng: 82.9,
                    address: None,
                },
                phone: Some("+91 90000 11111".into()),
            })
            .await?;
        list.assert();
        create.assert();
        assert_eq!(created.id, "u-2");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() -> Result<()> {
        let mut config = DashboardConfig::from_url("http://127.0.0.1:9")?;
        config.timeout = std::time::Duration::from_millis(500);
        let api = HttpDashboardApi::new(&config)?;
        let err = api
            .fetch_stats()
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected network failure"))?;
        assert_eq!(err.kind(), ErrorKind::Network);
        Ok(())
    }
}
