//! Shared context, error types and exit codes for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use ruralcare_dashboard::{
    DashboardConfig, DashboardCoordinator, DashboardError, ErrorKind, HttpDashboardApi,
    LocationPolicy,
};
use url::Url;

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<DashboardError> for CliError {
    fn from(err: DashboardError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::Validation(err.detail()),
            ErrorKind::Network => Self::Failure(anyhow!("network error: {}", err.detail())),
            ErrorKind::Server => Self::Failure(anyhow!("server error: {}", err.detail())),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) api: HttpDashboardApi,
    pub(crate) config: DashboardConfig,
}

impl AppContext {
    /// Build the dashboard configuration and HTTP client from parsed flags.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = DashboardConfig::new(cli.api_url.clone());
        config.timeout = Duration::from_secs(cli.timeout);
        if cli.strict_location {
            config.location_policy = LocationPolicy::Strict;
        }
        Self::with_config(config)
    }

    pub(crate) fn with_config(config: DashboardConfig) -> CliResult<Self> {
        let api = HttpDashboardApi::new(&config)?;
        Ok(Self { api, config })
    }

    /// Fresh coordinator bound to this context's backend.
    pub(crate) fn coordinator(&self) -> DashboardCoordinator<HttpDashboardApi> {
        DashboardCoordinator::new(self.api.clone(), &self.config)
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .trim()
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_errors_map_to_exit_codes() {
        let rejected: CliError = DashboardError::Server {
            operation: "reports.create",
            status: 422,
            detail: Some("symptoms: field required".into()),
        }
        .into();
        assert_eq!(rejected.exit_code(), 2);
        assert!(rejected.display_message().contains("field required"));

        let failed: CliError = DashboardError::Server {
            operation: "dashboard.stats",
            status: 500,
            detail: None,
        }
        .into();
        assert_eq!(failed.exit_code(), 3);
        assert!(failed.display_message().starts_with("server error"));

        let local: CliError = DashboardError::validation("symptoms", "symptoms are required").into();
        assert_eq!(local.exit_code(), 2);
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://localhost:8001").is_ok());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn context_rejects_non_http_scheme() {
        let config = DashboardConfig::new(Url::parse("ftp://example.org").expect("url"));
        let err = AppContext::with_config(config)
            .err()
            .expect("ftp should be rejected");
        assert_eq!(err.exit_code(), 2);
    }
}
