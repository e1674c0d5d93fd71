//! API-specific error types
//!
//! Every failure of an EagleView call surfaces as an [`ApiError`]. The HTTP
//! variants keep the status and the raw body text untouched, since the body
//! is often the only diagnostic the server gives.

use std::time::Duration;

use eagleview_common::hydrate::HydrationError;
use serde_json::Value;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 422 - fix the input and try again
    Validation,
    /// 404 - terminal for that call
    NotFound,
    /// 400 and unclassified statuses - terminal
    Client,
    /// Token grant rejected, or no token to send
    Authentication,
    /// 5xx - may be retried
    Server,
    /// Connection-level failures - may be retried
    Network,
    /// Polling gave up
    Timeout,
    /// Bad local configuration
    Config,
    /// A 2xx body did not have the expected shape
    Decode,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The given data failed to pass validation: {body}")]
    Validation { errors: Value, body: String },

    #[error("The resource you are looking for could not be found")]
    NotFound,

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("{message}")]
    Server { status: u16, body: String, message: String },

    #[error("Unexpected response status {status}: {body}")]
    Unclassified { status: u16, body: String },

    #[error("Timed out after {elapsed:?} ({attempts} attempts), last output: {last_output}")]
    Timeout { elapsed: Duration, attempts: u32, last_output: String },

    #[error("Token request rejected with status {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("No access token available; log in or bind a token first")]
    Unauthenticated,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to hydrate response: {0}")]
    Hydration(#[source] HydrationError),
}

impl ApiError {
    /// Server error carrying the operator-facing message for `status`/`body`
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = format!(
            "Looks like there was a problem on EagleView's end. You did nothing wrong. \
             The server returned a {status} with the message \"{body}\""
        );
        Self::Server { status, body, message }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Validation { .. } => ApiErrorCategory::Validation,
            Self::NotFound => ApiErrorCategory::NotFound,
            Self::ActionFailed(_) | Self::Unclassified { .. } => ApiErrorCategory::Client,
            Self::Auth { .. } | Self::Unauthenticated => ApiErrorCategory::Authentication,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Timeout { .. } => ApiErrorCategory::Timeout,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Decode(_) | Self::Hydration(_) => ApiErrorCategory::Decode,
        }
    }

    /// Check if wrapping the call in a retry policy could help
    pub fn should_retry(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Server | ApiErrorCategory::Network)
    }

    /// HTTP status that produced this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(422),
            Self::NotFound => Some(404),
            Self::ActionFailed(_) => Some(400),
            Self::Server { status, .. }
            | Self::Unclassified { status, .. }
            | Self::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body text, verbatim
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Validation { body, .. }
            | Self::Server { body, .. }
            | Self::Unclassified { body, .. }
            | Self::Auth { body, .. } => Some(body),
            Self::ActionFailed(body) => Some(body),
            _ => None,
        }
    }

    /// Field-level violations of a 422 response
    pub fn validation_errors(&self) -> Option<&Value> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Whether the server refused the access token (401/403)
    ///
    /// Raw-token clients cannot refresh, so this is how they learn their
    /// token is no longer valid.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
