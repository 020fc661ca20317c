//! Location resolution for submitted reports.
//!
//! There is no geocoder behind the dashboard. [`JitterResolver`] keeps the
//! deployed behaviour (a point scattered around a fixed district centre when
//! the reporter gives no coordinates); [`StrictResolver`] refuses to invent
//! coordinates at all.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ruralcare_api_models::GeoPoint;

use crate::config::LocationPolicy;
use crate::error::{DashboardError, DashboardResult};
use crate::state::ReportForm;

/// Reference latitude used by the jitter fallback.
pub const BASE_LAT: f64 = 28.7041;
/// Reference longitude used by the jitter fallback.
pub const BASE_LNG: f64 = 77.1025;
/// Maximum jitter, in degrees, applied on each axis.
pub const JITTER_DEGREES: f64 = 0.05;
/// Address recorded when the reporter leaves it blank.
pub const FALLBACK_ADDRESS: &str = "Rural Area, India";

/// Turns form entries into the location sent with a report.
pub trait LocationResolver: Send + Sync {
    /// Resolve the location for a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Validation`] when the form does not carry
    /// enough information for this resolver.
    fn resolve(&self, form: &ReportForm) -> DashboardResult<GeoPoint>;
}

/// Build the resolver selected by configuration.
#[must_use]
pub fn resolver_for(policy: LocationPolicy) -> Box<dyn LocationResolver> {
    match policy {
        LocationPolicy::Jitter => Box::new(JitterResolver::new()),
        LocationPolicy::Strict => Box::new(StrictResolver),
    }
}

/// Scatters a point around a reference coordinate when none is supplied.
pub struct JitterResolver {
    base_lat: f64,
    base_lng: f64,
    radius: f64,
    rng: Mutex<StdRng>,
}

impl JitterResolver {
    /// Resolver around the default district centre.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic resolver for reproducible output.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            base_lat: BASE_LAT,
            base_lng: BASE_LNG,
            radius: JITTER_DEGREES,
            rng: Mutex::new(rng),
        }
    }

    /// Move the reference point.
    #[must_use]
    pub fn centred_on(mut self, lat: f64, lng: f64) -> Self {
        self.base_lat = lat;
        self.base_lng = lng;
        self
    }
}

impl Default for JitterResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationResolver for JitterResolver {
    fn resolve(&self, form: &ReportForm) -> DashboardResult<GeoPoint> {
        let address = form
            .address_text()
            .map_or_else(|| FALLBACK_ADDRESS.to_string(), str::to_string);
        if let Some((lat, lng)) = form.coordinates {
            return Ok(GeoPoint {
                lat,
                lng,
                address: Some(address),
            });
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let lat = self.base_lat + rng.random_range(-self.radius..=self.radius);
        let lng = self.base_lng + rng.random_range(-self.radius..=self.radius);
        drop(rng);
        tracing::debug!(lat, lng, "no coordinates supplied; using jittered placeholder");
        Ok(GeoPoint {
            lat,
            lng,
            address: Some(address),
        })
    }
}

/// Requires explicit coordinates on every report. An address alone is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictResolver;

impl LocationResolver for StrictResolver {
    fn resolve(&self, form: &ReportForm) -> DashboardResult<GeoPoint> {
        let (lat, lng) = form.coordinates.ok_or_else(|| {
            DashboardError::validation("location", "latitude and longitude are required")
        })?;
        Ok(GeoPoint {
            lat,
            lng,
            address: form.address_text().map(str::to_string),
        })
    }
}
