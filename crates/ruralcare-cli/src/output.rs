//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use ruralcare_api_models::{
    Doctor, HealthReport, MedicalStockItem, Severity, User, WaterQualitySample,
};
use ruralcare_dashboard::projection::{
    Tone, format_date, needs_restock, quantity_tone, reporter_label, severity_tone, status_label,
    stock_status_tone, water_status_tone,
};
use ruralcare_dashboard::{Alert, DashboardConfig, DashboardData, LocationPolicy, ViewTab};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const ANSI_RESET: &str = "\x1b[0m";
const RECENT_ON_DASHBOARD: usize = 5;

/// Table rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Style {
    pub(crate) color: bool,
}

impl Style {
    fn badge(self, label: &str, width: usize, tone: Tone) -> String {
        let padded = format!("{label:<width$}");
        if self.color {
            format!("{}{padded}{ANSI_RESET}", tone.ansi())
        } else {
            padded
        }
    }
}

fn severity_badge(style: Style, severity: Severity, width: usize) -> String {
    style.badge(severity.as_str(), width, severity_tone(severity))
}

#[derive(Serialize)]
struct StockRow<'a> {
    #[serde(flatten)]
    item: &'a MedicalStockItem,
    needs_restock: bool,
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Render one dashboard view.
pub(crate) fn format_tab(
    tab: ViewTab,
    data: &DashboardData,
    config: &DashboardConfig,
    format: OutputFormat,
    style: Style,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => match tab {
            ViewTab::Dashboard => to_json(&json!({
                "stats": data.stats,
                "reports": data.reports.iter().take(RECENT_ON_DASHBOARD).collect::<Vec<_>>(),
            })),
            ViewTab::Reports => to_json(&data.reports),
            ViewTab::WaterQuality => to_json(&data.water_quality),
            ViewTab::Doctors => to_json(&data.doctors),
            ViewTab::Stock => to_json(&stock_rows(&data.medical_stock)),
            ViewTab::Settings => to_json(&settings_json(config)),
        },
        OutputFormat::Table => Ok(match tab {
            ViewTab::Dashboard => format_dashboard(data, style),
            ViewTab::Reports => format_reports(&data.reports, style),
            ViewTab::WaterQuality => format_water(&data.water_quality, style),
            ViewTab::Doctors => format_doctors(&data.doctors),
            ViewTab::Stock => format_stock(&data.medical_stock, style),
            ViewTab::Settings => format_settings(config),
        }),
    }
}

fn stock_rows(items: &[MedicalStockItem]) -> Vec<StockRow<'_>> {
    items
        .iter()
        .map(|item| StockRow {
            item,
            needs_restock: needs_restock(item.quantity),
        })
        .collect()
}

fn policy_name(policy: LocationPolicy) -> &'static str {
    match policy {
        LocationPolicy::Jitter => "jitter",
        LocationPolicy::Strict => "strict",
    }
}

fn settings_json(config: &DashboardConfig) -> serde_json::Value {
    json!({
        "api_root": config.api_root().as_str(),
        "timeout_secs": config.timeout.as_secs(),
        "report_limit": config.report_limit,
        "water_limit": config.water_limit,
        "alert_period_secs": config.alert_period.as_secs(),
        "alert_capacity": config.alert_capacity,
        "location_policy": policy_name(config.location_policy),
        "views": ViewTab::ALL.iter().map(|tab| tab.id()).collect::<Vec<_>>(),
    })
}

pub(crate) fn format_dashboard(data: &DashboardData, style: Style) -> String {
    let stats = &data.stats;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "total reports: {:<8} active cases: {:<8} alerts: {}",
        stats.total_reports, stats.active_cases, stats.alerts
    );
    let _ = writeln!(
        out,
        "water quality: {:<8.1} doctors available: {:<3} critical stocks: {}",
        stats.water_quality_average, stats.doctors_available, stats.critical_stocks
    );
    out.push_str("recent reports:\n");
    if data.reports.is_empty() {
        out.push_str("  (none)\n");
    }
    for report in data.reports.iter().take(RECENT_ON_DASHBOARD) {
        let _ = writeln!(
            out,
            "  {} {:<10} {:<16} {}",
            severity_badge(style, report.severity, 9),
            format_date(&report.date_reported),
            reporter_label(report),
            report.symptoms
        );
    }
    out
}

pub(crate) fn format_reports(reports: &[HealthReport], style: Style) -> String {
    let mut out = format!(
        "{:<24} {:<9} {:<14} {:<20} {:<16} {:<10} ADDRESS\n",
        "ID", "SEVERITY", "TYPE", "STATUS", "REPORTER", "DATE"
    );
    for report in reports {
        let _ = writeln!(
            out,
            "{:<24} {} {:<14} {:<20} {:<16} {:<10} {}",
            report.id,
            severity_badge(style, report.severity, 9),
            status_label(report.report_type.as_str()),
            status_label(report.status.as_str()),
            reporter_label(report),
            format_date(&report.date_reported),
            report.location.address_text().unwrap_or("-")
        );
    }
    out
}

pub(crate) fn format_report_detail(report: &HealthReport, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id: {}", report.id);
    let _ = writeln!(out, "severity: {}", severity_badge(style, report.severity, 0));
    let _ = writeln!(out, "type: {}", status_label(report.report_type.as_str()));
    let _ = writeln!(out, "status: {}", status_label(report.status.as_str()));
    let _ = writeln!(out, "reporter: {}", reporter_label(report));
    let _ = writeln!(out, "reported: {}", format_date(&report.date_reported));
    let _ = writeln!(out, "symptoms: {}", report.symptoms);
    let _ = writeln!(
        out,
        "location: {:.4}, {:.4} ({})",
        report.location.lat,
        report.location.lng,
        report.location.address_text().unwrap_or("no address")
    );
    if let Some(notes) = &report.additional_info {
        let _ = writeln!(out, "notes: {notes}");
    }
    out
}

pub(crate) fn format_water(samples: &[WaterQualitySample], style: Style) -> String {
    let mut out = format!(
        "{:<24} {:<9} {:>5} {:>7} {:>9} {:>8} {:<10} {:<16} ADDRESS\n",
        "ID", "STATUS", "PH", "TDS", "TURBIDITY", "CHLORINE", "TESTED", "BY"
    );
    for sample in samples {
        let _ = writeln!(
            out,
            "{:<24} {} {:>5.1} {:>7.0} {:>9.1} {:>8.2} {:<10} {:<16} {}",
            sample.id,
            style.badge(sample.status.as_str(), 9, water_status_tone(sample.status)),
            sample.ph_level,
            sample.tds_value,
            sample.turbidity,
            sample.chlorine_level,
            format_date(&sample.test_date),
            sample.tested_by,
            sample.location.address_text().unwrap_or("-")
        );
    }
    out
}

pub(crate) fn format_doctors(doctors: &[Doctor]) -> String {
    let mut out = format!(
        "{:<24} {:<20} {:<14} {:<18} CLINIC\n",
        "NAME", "SPECIALIZATION", "AVAILABILITY", "PHONE"
    );
    for doctor in doctors {
        let _ = writeln!(
            out,
            "{:<24} {:<20} {:<14} {:<18} {}",
            doctor.name,
            doctor.specialization,
            doctor.availability,
            doctor.phone,
            doctor.clinic_name.as_deref().unwrap_or("-")
        );
    }
    out
}

pub(crate) fn format_users(users: &[User]) -> String {
    let mut out = format!(
        "{:<24} {:<28} {:<13} {:<18} ADDRESS\n",
        "NAME", "EMAIL", "ROLE", "PHONE"
    );
    for user in users {
        let _ = writeln!(
            out,
            "{:<24} {:<28} {:<13} {:<18} {}",
            user.name,
            user.email,
            status_label(user.role.as_str()),
            user.phone.as_deref().unwrap_or("-"),
            user.location.address_text().unwrap_or("-")
        );
    }
    out
}

pub(crate) fn format_stock(items: &[MedicalStockItem], style: Style) -> String {
    let mut out = format!(
        "{:<28} {:>8} {:<10} {:<13} {:<10} ACTION\n",
        "ITEM", "QTY", "UNIT", "STATUS", "EXPIRES"
    );
    for item in items {
        let quantity = style.badge(&item.quantity.to_string(), 8, quantity_tone(item.quantity));
        let expires = item
            .expiry_date
            .as_ref()
            .map_or_else(|| "-".to_string(), format_date);
        let action = if needs_restock(item.quantity) {
            "Request Restock"
        } else {
            "-"
        };
        let _ = writeln!(
            out,
            "{:<28} {} {:<10} {} {:<10} {}",
            item.item_name,
            quantity,
            item.unit,
            style.badge(
                &status_label(item.status.as_str()),
                13,
                stock_status_tone(item.status)
            ),
            expires,
            action
        );
    }
    out
}

pub(crate) fn format_settings(config: &DashboardConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "api root: {}", config.api_root());
    let _ = writeln!(out, "timeout: {}s", config.timeout.as_secs());
    let _ = writeln!(
        out,
        "list limits: reports {} / water {}",
        config.report_limit, config.water_limit
    );
    let _ = writeln!(
        out,
        "alerts: every {}s, keep {}",
        config.alert_period.as_secs(),
        config.alert_capacity
    );
    let _ = writeln!(out, "location policy: {}", policy_name(config.location_policy));
    out.push_str("views:\n");
    for tab in ViewTab::ALL {
        let _ = writeln!(out, "  {:<14} {}", tab.id(), tab.label());
    }
    out
}

pub(crate) fn format_alerts(alerts: &[Alert], style: Style) -> String {
    let mut out = String::from("alerts:\n");
    if alerts.is_empty() {
        out.push_str("  (none yet)\n");
    }
    for alert in alerts {
        let _ = writeln!(
            out,
            "  {} {} {} ({})",
            alert.raised_at.format("%H:%M:%S"),
            severity_badge(style, alert.severity, 9),
            alert.title,
            alert.location
        );
    }
    out
}
