//! Pure display mapping for dashboard entities.
//!
//! Every function here is total and side-effect free: `Unknown` statuses
//! map to [`Tone::Neutral`] rather than failing.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use ruralcare_api_models::{HealthReport, MedicalStockItem, Severity, StockStatus, WaterStatus};

/// Quantity below which an item is flagged for restock.
pub const RESTOCK_THRESHOLD: i64 = 10;

const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Colour token attached to badges and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Urgent / unsafe.
    Red,
    /// Elevated.
    Orange,
    /// Caution.
    Yellow,
    /// Healthy.
    Green,
    /// Unclassified.
    Neutral,
}

impl Tone {
    /// Token name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Neutral => "gray",
        }
    }

    /// Utility classes for a badge in this tone.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Red => "text-red-600 bg-red-100",
            Self::Orange => "text-orange-600 bg-orange-100",
            Self::Yellow => "text-yellow-600 bg-yellow-100",
            Self::Green => "text-green-600 bg-green-100",
            Self::Neutral => "text-gray-600 bg-gray-100",
        }
    }

    /// ANSI foreground escape for terminal rendering.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Orange => "\x1b[38;5;208m",
            Self::Yellow => "\x1b[33m",
            Self::Green => "\x1b[32m",
            Self::Neutral => "\x1b[37m",
        }
    }
}

/// Severity → tone.
#[must_use]
pub const fn severity_tone(severity: Severity) -> Tone {
    match severity {
        Severity::Critical => Tone::Red,
        Severity::High => Tone::Orange,
        Severity::Medium => Tone::Yellow,
        Severity::Low => Tone::Green,
        Severity::Unknown => Tone::Neutral,
    }
}

/// Water status → tone.
#[must_use]
pub const fn water_status_tone(status: WaterStatus) -> Tone {
    match status {
        WaterStatus::Safe => Tone::Green,
        WaterStatus::Moderate => Tone::Yellow,
        WaterStatus::Unsafe => Tone::Red,
        WaterStatus::Unknown => Tone::Neutral,
    }
}

/// Stock status → tone. `OutOfStock` has no badge colour of its own; the
/// quantity figure carries the alarm.
#[must_use]
pub const fn stock_status_tone(status: StockStatus) -> Tone {
    match status {
        StockStatus::Adequate => Tone::Green,
        StockStatus::Low => Tone::Yellow,
        StockStatus::Critical => Tone::Red,
        StockStatus::OutOfStock | StockStatus::Unknown => Tone::Neutral,
    }
}

/// Client-side restock flag, independent of the server-reported status.
#[must_use]
pub const fn needs_restock(quantity: i64) -> bool {
    quantity < RESTOCK_THRESHOLD
}

/// Tone of the quantity figure on a stock card.
#[must_use]
pub const fn quantity_tone(quantity: i64) -> Tone {
    if quantity <= 0 {
        Tone::Red
    } else if needs_restock(quantity) {
        Tone::Orange
    } else {
        Tone::Green
    }
}

/// Items flagged for restock, in input order.
#[must_use]
pub fn restock_candidates(items: &[MedicalStockItem]) -> Vec<&MedicalStockItem> {
    items
        .iter()
        .filter(|item| needs_restock(item.quantity))
        .collect()
}

/// Status label with underscores rendered as spaces.
#[must_use]
pub fn status_label(status: &str) -> String {
    status.replace('_', " ")
}

/// Name shown for a report's author.
#[must_use]
pub fn reporter_label(report: &HealthReport) -> &str {
    let name = report.reporter_name.trim();
    if report.is_anonymous || name.is_empty() {
        "Anonymous"
    } else {
        name
    }
}

/// Render a timestamp as a date in the viewer's local zone.
#[must_use]
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    format_date_in(timestamp, &Local)
}

/// Render a timestamp as a date in the given zone.
#[must_use]
pub fn format_date_in<Tz>(timestamp: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(zone)
        .format(DATE_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use ruralcare_api_models::{GeoPoint, ReportStatus, ReportType};

    #[test]
    fn severity_mapping_is_total() {
        assert_eq!(severity_tone(Severity::Critical), Tone::Red);
        assert_eq!(severity_tone(Severity::High), Tone::Orange);
        assert_eq!(severity_tone(Severity::Medium), Tone::Yellow);
        assert_eq!(severity_tone(Severity::Low), Tone::Green);
        assert_eq!(severity_tone(Severity::Unknown), Tone::Neutral);
        assert_eq!(Tone::Neutral.badge_class(), "text-gray-600 bg-gray-100");
        assert_eq!(Tone::Neutral.name(), "gray");
    }

    #[test]
    fn water_and_stock_mappings_fall_back_to_neutral() {
        assert_eq!(water_status_tone(WaterStatus::Safe), Tone::Green);
        assert_eq!(water_status_tone(WaterStatus::Moderate), Tone::Yellow);
        assert_eq!(water_status_tone(WaterStatus::Unsafe), Tone::Red);
        assert_eq!(water_status_tone(WaterStatus::Unknown), Tone::Neutral);

        assert_eq!(stock_status_tone(StockStatus::Adequate), Tone::Green);
        assert_eq!(stock_status_tone(StockStatus::Low), Tone::Yellow);
        assert_eq!(stock_status_tone(StockStatus::Critical), Tone::Red);
        assert_eq!(stock_status_tone(StockStatus::OutOfStock), Tone::Neutral);
        assert_eq!(stock_status_tone(StockStatus::Unknown), Tone::Neutral);
    }

    #[test]
    fn restock_boundary_is_ten() {
        assert!(needs_restock(0));
        assert!(needs_restock(9));
        assert!(!needs_restock(10));
        assert!(!needs_restock(11));

        assert!(needs_restock(-2));

        assert_eq!(quantity_tone(-2), Tone::Red);
        assert_eq!(quantity_tone(0), Tone::Red);
        assert_eq!(quantity_tone(9), Tone::Orange);
        assert_eq!(quantity_tone(10), Tone::Green);
    }

    #[test]
    fn restock_ignores_server_status() {
        let item = |quantity, status| MedicalStockItem {
            id: format!("s-{quantity}"),
            item_name: "ORS".into(),
            quantity,
            unit: "packets".into(),
            status,
            location: None,
            expiry_date: None,
            last_updated: Utc::now(),
        };
        let items = vec![
            item(3, StockStatus::Adequate),
            item(40, StockStatus::Critical),
            item(9, StockStatus::Low),
        ];
        let flagged: Vec<_> = restock_candidates(&items)
            .into_iter()
            .map(|item| item.quantity)
            .collect();
        assert_eq!(flagged, vec![3, 9]);
    }

    #[test]
    fn labels_are_humanised() {
        assert_eq!(status_label("out_of_stock"), "out of stock");
        assert_eq!(status_label("safe"), "safe");

        let mut report = HealthReport {
            id: "r-1".into(),
            reporter_id: None,
            reporter_name: "Priya".into(),
            is_anonymous: true,
            report_type: ReportType::Disease,
            symptoms: "fever".into(),
            severity: Severity::High,
            location: GeoPoint::default(),
            date_reported: Utc::now(),
            status: ReportStatus::Active,
            additional_info: None,
        };
        assert_eq!(reporter_label(&report), "Anonymous");
        report.is_anonymous = false;
        assert_eq!(reporter_label(&report), "Priya");
    }

    #[test]
    fn dates_follow_the_viewer_zone() {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 1, 14, 22, 30, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(format_date_in(&timestamp, &Utc), "1/14/2025");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("valid offset");
        assert_eq!(format_date_in(&timestamp, &ist), "1/15/2025");
        assert!(!format_date(&timestamp).is_empty());
    }
}
