//! Token grants and expiry evaluation
//!
//! [`TokenManager`] performs the two grant calls against `POST /Token`
//! (password and refresh-token) and decides when a held token is stale.
//! It never stores a token; the client owns the current one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eagleview_common::resilience::{Clock, SystemClock};
use eagleview_domain::constants::{GRANT_TYPE_PASSWORD, GRANT_TYPE_REFRESH_TOKEN, TOKEN_PATH};
use eagleview_domain::{Credentials, Token, TokenResponse};
use reqwest::Method;
use tracing::{info, instrument, warn};

use super::errors::ApiError;
use super::executor::{RequestExecutor, RequestOptions};
use crate::http::HttpTransport;

/// Issues and refreshes access tokens
pub struct TokenManager<T, C = SystemClock> {
    executor: Arc<RequestExecutor<T>>,
    clock: C,
}

impl<T: HttpTransport, C: Clock> TokenManager<T, C> {
    pub fn new(executor: Arc<RequestExecutor<T>>, clock: C) -> Self {
        Self { executor, clock }
    }

    /// Current wall-clock time as seen by this manager
    pub fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.clock.system_time())
    }

    /// Exchange a username and password for a new token
    ///
    /// # Errors
    /// `Auth` when the grant is rejected with a 4xx, `Server` on 5xx,
    /// `Decode` when the response is not a token.
    #[instrument(skip_all)]
    pub fn issue(
        &self,
        username: &str,
        password: &str,
        credentials: &Credentials,
    ) -> Result<Token, ApiError> {
        info!(source_id = %credentials.source_id, "requesting password grant");
        self.grant(
            [
                ("grant_type", GRANT_TYPE_PASSWORD),
                ("username", username),
                ("password", password),
            ],
            credentials,
        )
    }

    /// Exchange `token`'s refresh token for a new token
    ///
    /// `token` is left as it was. When the server omits a new refresh token
    /// the old one is carried over.
    ///
    /// # Errors
    /// `Config` when `token` has no refresh token, otherwise as for
    /// [`TokenManager::issue`].
    #[instrument(skip_all)]
    pub fn refresh(&self, token: &Token, credentials: &Credentials) -> Result<Token, ApiError> {
        if token.refresh_token().is_empty() {
            return Err(ApiError::Config("token carries no refresh token".to_string()));
        }

        info!(
            source_id = %credentials.source_id,
            expires_at = %token.expires_at(),
            "requesting refresh-token grant"
        );
        let refreshed = self.grant(
            [("grant_type", GRANT_TYPE_REFRESH_TOKEN), ("refresh_token", token.refresh_token())],
            credentials,
        )?;

        if refreshed.refresh_token().is_empty() {
            return Ok(refreshed.with_refresh_token(token.refresh_token()));
        }
        Ok(refreshed)
    }

    /// Whether `token` must be refreshed before its next use
    pub fn needs_refresh(&self, token: &Token) -> bool {
        token.needs_refresh(self.now())
    }

    fn grant<'a>(
        &self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
        credentials: &Credentials,
    ) -> Result<Token, ApiError> {
        let options = RequestOptions::new().basic_auth(credentials).form(fields);

        let response: TokenResponse = self
            .executor
            .execute(Method::POST, TOKEN_PATH, options)
            .map_err(grant_error)?
            .deserialize()?;

        let token = Token::from_response(response, self.now())?;
        info!(expires_at = %token.expires_at(), "token granted");
        Ok(token)
    }
}

/// Client-side rejections of a grant become `Auth`; server failures pass through
fn grant_error(err: ApiError) -> ApiError {
    match err.status() {
        Some(status) if (400..500).contains(&status) => {
            warn!(status, "token grant rejected");
            ApiError::Auth { status, body: err.body().unwrap_or_default().to_string() }
        }
        _ => err,
    }
}
