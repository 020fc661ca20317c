//! # Design
//!
//! - Constant error messages; context travels in fields.
//! - Every variant classifies into an [`ErrorKind`] so the user sees network,
//!   validation and server failures distinctly.
//! - Source errors are preserved, never re-logged at call sites.

use thiserror::Error;

/// Result alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Coarse classification used when surfacing failures to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend could not be reached or timed out.
    Network,
    /// Input was rejected, locally or by the backend.
    Validation,
    /// The backend failed or returned something unusable.
    Server,
}

impl ErrorKind {
    /// Short label for logs and rendered notices.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Server => "server",
        }
    }
}

/// Errors raised by the dashboard coordinator and its API client.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration value was unusable.
    #[error("invalid dashboard configuration")]
    Config {
        /// Configuration field at fault.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// Building an endpoint URL failed.
    #[error("invalid endpoint url")]
    Url {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// Constructing the HTTP client failed.
    #[error("http client construction failed")]
    ClientBuild {
        /// Underlying client error.
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out.
    #[error("request could not be completed")]
    Network {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("backend returned an error status")]
    Server {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Diagnostic detail extracted from the error body.
        detail: Option<String>,
    },
    /// The response body did not match the expected shape.
    #[error("response body could not be decoded")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying decode error.
        source: reqwest::Error,
    },
    /// Local validation rejected the input before anything was sent.
    #[error("input failed validation")]
    Validation {
        /// Field at fault.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// The API implementation does not support the operation.
    #[error("operation not supported by this api")]
    Unsupported {
        /// Operation identifier.
        operation: &'static str,
    },
}

impl DashboardError {
    /// Build a validation error for a form field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify the error for user-facing notices.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::ClientBuild { .. } => ErrorKind::Network,
            Self::Config { .. } | Self::Url { .. } | Self::Validation { .. } => {
                ErrorKind::Validation
            }
            Self::Server { status, .. } => match *status {
                400 | 409 | 422 => ErrorKind::Validation,
                _ => ErrorKind::Server,
            },
            Self::Decode { .. } | Self::Unsupported { .. } => ErrorKind::Server,
        }
    }

    /// Human-readable description including the context fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Config { field, message } => format!("{field}: {message}"),
            Self::Url { operation, source } => format!("{operation}: {source}"),
            Self::ClientBuild { source } => format!("http client: {source}"),
            Self::Network { operation, source } => {
                if source.is_timeout() {
                    format!("{operation}: request timed out")
                } else {
                    format!("{operation}: {source}")
                }
            }
            Self::Server {
                operation,
                status,
                detail,
            } => detail.as_ref().map_or_else(
                || format!("{operation}: status {status}"),
                |detail| format!("{operation}: {detail} (status {status})"),
            ),
            Self::Decode { operation, source } => format!("{operation}: {source}"),
            Self::Validation { field, message } => format!("{field}: {message}"),
            Self::Unsupported { operation } => format!("{operation} is not supported"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_status_classifies_validation_rejections() {
        let rejected = DashboardError::Server {
            operation: "reports.create",
            status: 422,
            detail: Some("field required".into()),
        };
        assert_eq!(rejected.kind(), ErrorKind::Validation);
        assert_eq!(
            rejected.detail(),
            "reports.create: field required (status 422)"
        );

        let failed = DashboardError::Server {
            operation: "dashboard.stats",
            status: 500,
            detail: None,
        };
        assert_eq!(failed.kind(), ErrorKind::Server);
        assert_eq!(failed.detail(), "dashboard.stats: status 500");
    }

    #[test]
    fn local_validation_is_validation_kind() {
        let err = DashboardError::validation("symptoms", "symptoms are required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "input failed validation");
        assert_eq!(err.detail(), "symptoms: symptoms are required");
    }
}
