use crate::cli::{OutputFormat, ViewArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{Style, format_tab};

pub(crate) async fn handle_view(
    ctx: &AppContext,
    args: &ViewArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<()> {
    let text = load_view(ctx, args, format, style).await?;
    print!("{text}");
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

async fn load_view(
    ctx: &AppContext,
    args: &ViewArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<String> {
    let mut coordinator = ctx.coordinator();
    if let Err(err) = coordinator.load_all().await {
        for notice in coordinator.take_notices() {
            eprintln!("{}", notice.message);
        }
        return Err(err.into());
    }
    coordinator.view_mut().select_tab(args.tab);
    format_tab(
        coordinator.view().active_tab,
        coordinator.data(),
        &ctx.config,
        format,
        style,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use ruralcare_dashboard::{DashboardConfig, ViewTab};
    use serde_json::json;

    fn context(server: &MockServer) -> AppContext {
        let config = DashboardConfig::from_url(&server.base_url()).expect("config");
        AppContext::with_config(config).expect("context")
    }

    fn mock_backend(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({
                "total_reports": 42,
                "active_cases": 2,
                "alerts": 1,
                "water_quality_average": 7.2,
                "doctors_available": 0,
                "critical_stocks": 1
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/reports").query_param("limit", "15");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/water-quality")
                .query_param("limit", "15");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/doctors");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/medical-stock");
            then.status(200).json_body(json!([{
                "id": "s-1",
                "item_name": "ORS packets",
                "quantity": 3,
                "unit": "boxes",
                "status": "critical",
                "last_updated": "2025-01-14T09:30:00"
            }]));
        });
    }

    #[tokio::test]
    async fn stock_view_renders_restock_action() {
        let server = MockServer::start_async().await;
        mock_backend(&server);

        let text = load_view(
            &context(&server),
            &ViewArgs { tab: ViewTab::Stock },
            OutputFormat::Table,
            Style::default(),
        )
        .await
        .expect("view renders");
        assert!(text.contains("ORS packets"));
        assert!(text.contains("Request Restock"));
    }

    #[tokio::test]
    async fn dashboard_view_shows_counters() {
        let server = MockServer::start_async().await;
        mock_backend(&server);

        let text = load_view(
            &context(&server),
            &ViewArgs {
                tab: ViewTab::Dashboard,
            },
            OutputFormat::Table,
            Style::default(),
        )
        .await
        .expect("view renders");
        assert!(text.contains("total reports: 42"));
        assert!(text.contains("(none)"));
    }

    #[tokio::test]
    async fn failed_fetch_maps_to_failure_exit_code() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(503).body("maintenance");
        });

        let err = load_view(
            &context(&server),
            &ViewArgs {
                tab: ViewTab::Dashboard,
            },
            OutputFormat::Json,
            Style::default(),
        )
        .await
        .expect_err("load should fail");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("maintenance"));
    }
}
