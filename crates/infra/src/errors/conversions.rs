//! Conversions from external errors into SDK errors.

use std::fmt::Display;

use eagleview_common::hydrate::HydrationError;
use eagleview_common::resilience::RetryError;
use eagleview_domain::EagleViewError;
use reqwest::Error as HttpError;

use crate::api::errors::ApiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EagleViewError);

impl From<InfraError> for EagleViewError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EagleViewError> for InfraError {
    fn from(value: EagleViewError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            return ApiError::Network("HTTP request timed out".into());
        }

        if err.is_connect() {
            return ApiError::Network(format!("HTTP connection failure: {err}"));
        }

        if err.is_decode() || err.is_body() {
            return ApiError::Network(format!("HTTP body could not be read: {err}"));
        }

        ApiError::Network(format!("HTTP error: {err}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError::from(ApiError::from(value))
    }
}

/* -------------------------------------------------------------------------- */
/* ApiError ↔ EagleViewError */
/* -------------------------------------------------------------------------- */

impl From<EagleViewError> for ApiError {
    fn from(err: EagleViewError) -> Self {
        match err {
            EagleViewError::Config(msg) | EagleViewError::Internal(msg) => ApiError::Config(msg),
            EagleViewError::InvalidInput(msg) => ApiError::Decode(msg),
            EagleViewError::Auth(_) => ApiError::Unauthenticated,
            EagleViewError::Network(msg) => ApiError::Network(msg),
            EagleViewError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl From<ApiError> for InfraError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        InfraError(match err {
            ApiError::NotFound => EagleViewError::NotFound(message),
            ApiError::Auth { .. } | ApiError::Unauthenticated => EagleViewError::Auth(message),
            ApiError::Network(_) | ApiError::Server { .. } | ApiError::Timeout { .. } => {
                EagleViewError::Network(message)
            }
            ApiError::Config(_) => EagleViewError::Config(message),
            ApiError::Validation { .. }
            | ApiError::ActionFailed(_)
            | ApiError::Unclassified { .. } => EagleViewError::InvalidInput(message),
            ApiError::Decode(_) | ApiError::Hydration(_) => EagleViewError::Internal(message),
        })
    }
}

/* -------------------------------------------------------------------------- */
/* Configuration file formats → InfraError */
/* -------------------------------------------------------------------------- */

impl From<toml::de::Error> for InfraError {
    fn from(err: toml::de::Error) -> Self {
        InfraError(EagleViewError::Config(format!("invalid TOML config: {err}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(EagleViewError::Config(format!("invalid JSON config: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Hydration and retry → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HydrationError> for ApiError {
    fn from(err: HydrationError) -> Self {
        ApiError::Hydration(err)
    }
}

impl<T: Display> From<RetryError<T, ApiError>> for ApiError {
    fn from(err: RetryError<T, ApiError>) -> Self {
        match err {
            RetryError::TimeoutExceeded { elapsed, attempts, last_output } => {
                ApiError::Timeout { elapsed, attempts, last_output: last_output.to_string() }
            }
            RetryError::Operation(inner) => inner,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
