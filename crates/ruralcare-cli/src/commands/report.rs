use ruralcare_dashboard::{DashboardApi, ReportForm};

use crate::cli::{OutputFormat, ReportShowArgs, SubmitArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{Style, format_report_detail, to_json};

pub(crate) async fn handle_report_show(
    ctx: &AppContext,
    args: &ReportShowArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<()> {
    let id = args.id.trim();
    if id.is_empty() {
        return Err(CliError::validation("report id must not be empty"));
    }
    let report = ctx.api.fetch_report(id).await?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Table => print!("{}", format_report_detail(&report, style)),
    }
    Ok(())
}

pub(crate) fn form_from_args(args: SubmitArgs) -> ReportForm {
    ReportForm {
        reporter_name: args.name.unwrap_or_default(),
        report_type: args.report_type.into(),
        symptoms: args.symptoms,
        severity: args.severity.into(),
        address: args.address.unwrap_or_default(),
        coordinates: args.lat.zip(args.lng),
        is_anonymous: args.anonymous,
        additional_info: args.notes.unwrap_or_default(),
    }
}

pub(crate) async fn handle_submit(
    ctx: &AppContext,
    args: SubmitArgs,
    format: OutputFormat,
    style: Style,
) -> CliResult<()> {
    let mut coordinator = ctx.coordinator();
    *coordinator.view_mut().open_report_form() = form_from_args(args);

    let created = coordinator.submit_open_form().await?;
    // Only a failed follow-up refresh can leave a notice here.
    for notice in coordinator.take_notices() {
        eprintln!("{}", notice.message);
    }

    match format {
        OutputFormat::Json => println!("{}", to_json(&created)?),
        OutputFormat::Table => {
            print!("{}", format_report_detail(&created, style));
            println!(
                "dashboard now lists {} total reports",
                coordinator.data().stats.total_reports
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ReportTypeArg, SeverityArg};
    use httpmock::prelude::*;
    use ruralcare_api_models::{ReportType, Severity};
    use ruralcare_dashboard::DashboardConfig;
    use serde_json::json;

    fn context(server: &MockServer) -> AppContext {
        let config = DashboardConfig::from_url(&server.base_url()).expect("config");
        AppContext::with_config(config).expect("context")
    }

    fn submit_args() -> SubmitArgs {
        SubmitArgs {
            name: None,
            report_type: ReportTypeArg::Complaint,
            symptoms: "no clean water at the pump".into(),
            severity: SeverityArg::Medium,
            address: Some("Ward 2".into()),
            lat: Some(28.6),
            lng: Some(77.2),
            anonymous: true,
            notes: None,
        }
    }

    fn report_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "reporter_name": "",
            "is_anonymous": true,
            "report_type": "complaint",
            "symptoms": "no clean water at the pump",
            "severity": "medium",
            "location": {"lat": 28.6, "lng": 77.2, "address": "Ward 2"},
            "date_reported": "2025-01-14T09:30:00Z",
            "status": "active"
        })
    }

    #[test]
    fn form_carries_flag_values() {
        let form = form_from_args(submit_args());
        assert_eq!(form.report_type, ReportType::Complaint);
        assert_eq!(form.severity, Severity::Medium);
        assert_eq!(form.coordinates, Some((28.6, 77.2)));
        assert!(form.is_anonymous);
        assert!(form.reporter_name.is_empty());
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn show_fetches_by_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/reports/r-9");
            then.status(200).json_body(report_json("r-9"));
        });

        handle_report_show(
            &context(&server),
            &ReportShowArgs { id: "r-9".into() },
            OutputFormat::Json,
            Style::default(),
        )
        .await
        .expect("report shown");
        mock.assert();
    }

    #[tokio::test]
    async fn show_maps_missing_report_to_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/reports/missing");
            then.status(404).json_body(json!({"detail": "Report not found"}));
        });

        let err = handle_report_show(
            &context(&server),
            &ReportShowArgs {
                id: "missing".into(),
            },
            OutputFormat::Table,
            Style::default(),
        )
        .await
        .expect_err("missing report");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("Report not found"));
    }

    #[tokio::test]
    async fn rejected_submission_exits_with_validation_code() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/reports");
            then.status(422)
                .json_body(json!({"detail": [{"msg": "severity: invalid value"}]}));
        });
        let stats = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({}));
        });

        let err = handle_submit(
            &context(&server),
            submit_args(),
            OutputFormat::Json,
            Style::default(),
        )
        .await
        .expect_err("rejected");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("severity: invalid value"));
        create.assert();
        assert_eq!(stats.calls(), 0);
    }

    #[tokio::test]
    async fn local_validation_never_calls_backend() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/reports");
            then.status(200).json_body(report_json("r-1"));
        });
        let mut args = submit_args();
        args.anonymous = false;

        let err = handle_submit(
            &context(&server),
            args,
            OutputFormat::Table,
            Style::default(),
        )
        .await
        .expect_err("name required");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(create.calls(), 0);
    }
}
