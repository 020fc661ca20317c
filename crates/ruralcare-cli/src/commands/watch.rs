use std::time::Duration;

use anyhow::anyhow;
use ruralcare_dashboard::{AlertFeed, DashboardApi, DashboardCoordinator, MockAlertSource};
use ruralcare_telemetry::Metrics;
use serde_json::json;

use crate::cli::{OutputFormat, WatchArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{Style, format_alerts, format_dashboard};

pub(crate) async fn handle_watch(
    ctx: &AppContext,
    args: &WatchArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<()> {
    if args.refresh_secs == 0 {
        return Err(CliError::validation("refresh interval must be positive"));
    }
    let metrics = Metrics::new().map_err(CliError::failure)?;
    let coordinator = ctx.coordinator().with_metrics(metrics.clone());
    let source = args
        .seed
        .map_or_else(MockAlertSource::new, MockAlertSource::with_seed);
    let feed = AlertFeed::spawn(
        source,
        ctx.config.alert_period,
        ctx.config.alert_capacity,
        Some(metrics.clone()),
    );

    let outcome = tokio::select! {
        outcome = watch_loop(coordinator, &feed, args, format, style) => outcome,
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| CliError::failure(anyhow!("failed to listen for ctrl-c: {err}")))
        }
    };
    feed.shutdown().await;

    if args.metrics {
        println!("{}", metrics.render().map_err(CliError::failure)?);
    }
    outcome
}

async fn watch_loop<A: DashboardApi>(
    mut coordinator: DashboardCoordinator<A>,
    feed: &AlertFeed,
    args: &WatchArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<()> {
    let period = Duration::from_secs(args.refresh_secs);
    let mut completed = 0_u32;
    loop {
        // Failures keep the previous snapshot on screen; the notice says why.
        if coordinator.refresh().await.is_err() {
            for notice in coordinator.take_notices() {
                eprintln!("{}", notice.message);
            }
        }
        print!("{}", render_frame(&coordinator, feed, format, style)?);

        completed += 1;
        if args.cycles.is_some_and(|limit| completed >= limit) {
            return Ok(());
        }
        tokio::time::sleep(period).await;
    }
}

fn render_frame<A: DashboardApi>(
    coordinator: &DashboardCoordinator<A>,
    feed: &AlertFeed,
    format: OutputFormat,
    style: Style,
) -> CliResult<String> {
    let alerts = feed.recent();
    match format {
        OutputFormat::Json => {
            let frame = json!({
                "cycle": coordinator.refresh_attempts(),
                "stats": coordinator.data().stats,
                "alerts": alerts,
            });
            let text = serde_json::to_string(&frame)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            Ok(format!("{text}\n"))
        }
        OutputFormat::Table => Ok(format!(
            "== refresh #{} ==\n{}{}\n",
            coordinator.refresh_attempts(),
            format_dashboard(coordinator.data(), style),
            format_alerts(&alerts, style)
        )),
    }
}
