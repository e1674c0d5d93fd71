//! EagleView API client
//!
//! [`EagleView`] composes a [`RequestExecutor`] and a [`TokenManager`] that
//! share one transport, plus the clock used for expiry checks and polling.
//! The current credential state is an explicit [`Session`].

use std::fmt;
use std::sync::Arc;

use eagleview_common::resilience::{Clock, RetryPolicy, SystemClock};
use eagleview_domain::{ClientConfig, Credentials, Token};
use reqwest::Method;
use tracing::{debug, info};

use super::auth::TokenManager;
use super::errors::ApiError;
use super::executor::{Payload, RequestExecutor, RequestOptions};
use crate::http::{HttpClient, HttpTransport};

/// What the client authenticates its calls with
#[derive(Clone, PartialEq, Eq)]
pub enum Session {
    /// No token yet; domain calls fail with `Unauthenticated`
    Anonymous,
    /// A granted token, refreshable when credentials are known
    Token { token: Token, credentials: Option<Credentials> },
    /// An opaque token string; never refreshed
    Raw(String),
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Token { token, credentials } => f
                .debug_struct("Token")
                .field("token", token)
                .field("credentials", credentials)
                .finish(),
            Self::Raw(_) => f.write_str("Raw([redacted])"),
        }
    }
}

/// Client for the EagleView measurement-ordering API
///
/// One instance holds one session. It is not meant to be shared between
/// threads; build one client per thread instead.
pub struct EagleView<T = HttpClient, C = SystemClock> {
    config: ClientConfig,
    executor: Arc<RequestExecutor<T>>,
    tokens: TokenManager<T, C>,
    clock: C,
    session: Session,
}

impl EagleView<HttpClient, SystemClock> {
    /// Client with no token
    ///
    /// # Errors
    /// `Config` when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpClient::from_config(&config)?;
        Ok(Self::from_parts(config, transport, SystemClock))
    }

    /// Client holding a freshly issued token
    ///
    /// # Errors
    /// `Auth` when the password grant is rejected, or any transport failure.
    pub fn login(
        config: ClientConfig,
        username: &str,
        password: &str,
        credentials: Credentials,
    ) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;
        client.authenticate(username, password, credentials)?;
        Ok(client)
    }

    /// Client holding a token issued with the configured credentials
    ///
    /// # Errors
    /// `Config` when `config` carries no credentials, otherwise as for
    /// [`EagleView::login`].
    pub fn login_from_config(
        config: ClientConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;
        client.authenticate_from_config(username, password)?;
        Ok(client)
    }

    /// Client holding an existing token
    ///
    /// With credentials, given here or configured, a stale token is refreshed
    /// right away. Without them the token is used as is until it stops working.
    ///
    /// # Errors
    /// Any error from the immediate refresh.
    pub fn with_token(
        config: ClientConfig,
        token: Token,
        credentials: Option<Credentials>,
    ) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;
        client.bind_token(token, credentials)?;
        Ok(client)
    }

    /// Client holding an opaque token string that is never refreshed
    ///
    /// # Errors
    /// `Config` when the HTTP client cannot be built.
    pub fn with_raw_token(config: ClientConfig, raw: impl Into<String>) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;
        client.bind_raw_token(raw);
        Ok(client)
    }
}

impl<T: HttpTransport, C: Clock + Clone> EagleView<T, C> {
    /// Client over an injected transport and clock, with no token
    pub fn from_parts(config: ClientConfig, transport: T, clock: C) -> Self {
        let executor = Arc::new(RequestExecutor::new(config.endpoint.clone(), transport));
        let tokens = TokenManager::new(Arc::clone(&executor), clock.clone());
        Self { config, executor, tokens, clock, session: Session::Anonymous }
    }

    /// Issue a token with the password grant and bind it with `credentials`
    ///
    /// # Errors
    /// See [`TokenManager::issue`]. The session is unchanged on failure.
    pub fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        credentials: Credentials,
    ) -> Result<&Token, ApiError> {
        let token = self.tokens.issue(username, password, &credentials)?;
        info!(expires_at = %token.expires_at(), "client authenticated");
        self.install(token, Some(credentials))
    }

    /// Password grant with the credentials from [`ClientConfig`]
    ///
    /// # Errors
    /// `Config` when none are configured, otherwise see
    /// [`EagleView::authenticate`].
    pub fn authenticate_from_config(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<&Token, ApiError> {
        let credentials = self.config.credentials.clone().ok_or_else(|| {
            ApiError::Config("no integration credentials configured".to_string())
        })?;
        self.authenticate(username, password, credentials)
    }

    /// Bind an existing token, refreshing it first when stale and refreshable
    ///
    /// `credentials` falls back to the configured ones.
    ///
    /// # Errors
    /// See [`TokenManager::refresh`]. The session is unchanged on failure.
    pub fn bind_token(
        &mut self,
        token: Token,
        credentials: Option<Credentials>,
    ) -> Result<&Token, ApiError> {
        let credentials = credentials.or_else(|| self.config.credentials.clone());
        let token = match &credentials {
            Some(creds) if self.tokens.needs_refresh(&token) => {
                debug!(expires_at = %token.expires_at(), "bound token is stale, refreshing");
                self.tokens.refresh(&token, creds)?
            }
            _ => token,
        };
        self.install(token, credentials)
    }

    /// Bind an opaque token string
    pub fn bind_raw_token(&mut self, raw: impl Into<String>) {
        self.session = Session::Raw(raw.into());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The bound token, if the session holds a granted one
    pub fn token(&self) -> Option<&Token> {
        match &self.session {
            Session::Token { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Credentials refresh grants use: the session's own, else the configured ones
    ///
    /// A raw-token session never refreshes and has none.
    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.session {
            Session::Token { credentials: Some(credentials), .. } => Some(credentials),
            Session::Raw(_) => None,
            _ => self.config.credentials.as_ref(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    /// Whether the next call would need a refresh
    ///
    /// Always true without a token; always false for a raw token, since its
    /// expiry is unknown.
    pub fn is_token_expired(&self) -> bool {
        match &self.session {
            Session::Anonymous => true,
            Session::Token { token, .. } => self.tokens.needs_refresh(token),
            Session::Raw(_) => false,
        }
    }

    /// Replace the bound token with a refreshed one
    ///
    /// # Errors
    /// `Unauthenticated` without a token, `Config` when the session has no
    /// credentials to refresh with, otherwise see [`TokenManager::refresh`].
    pub fn refresh(&mut self) -> Result<&Token, ApiError> {
        let token = match &self.session {
            Session::Anonymous => return Err(ApiError::Unauthenticated),
            Session::Raw(_) => {
                return Err(ApiError::Config("a raw token cannot be refreshed".to_string()));
            }
            Session::Token { token, .. } => token,
        };
        let credentials = self.credentials().cloned().ok_or_else(|| {
            ApiError::Config("cannot refresh a token without integration credentials".to_string())
        })?;

        let refreshed = self.tokens.refresh(token, &credentials)?;
        self.install(refreshed, Some(credentials))
    }

    /// Access token for the next call, refreshing a stale one first
    ///
    /// # Errors
    /// `Unauthenticated` for an anonymous client, or any refresh error.
    pub fn access_token(&mut self) -> Result<String, ApiError> {
        let stale = match &self.session {
            Session::Anonymous => return Err(ApiError::Unauthenticated),
            Session::Raw(raw) => return Ok(raw.clone()),
            Session::Token { token, .. } => {
                self.credentials().is_some() && self.tokens.needs_refresh(token)
            }
        };

        if stale {
            self.refresh()?;
        }

        self.token()
            .map(|token| token.access_token().to_string())
            .ok_or(ApiError::Unauthenticated)
    }

    /// Polling budget in seconds
    pub fn timeout(&self) -> u64 {
        self.config.retry_timeout_secs
    }

    pub fn set_timeout(&mut self, secs: u64) -> &mut Self {
        self.config.retry_timeout_secs = secs;
        self
    }

    /// Polling policy using this client's budget, interval and clock
    pub fn retry_policy(&self) -> RetryPolicy<C> {
        RetryPolicy::with_clock(
            self.config.retry_timeout(),
            self.config.retry_interval(),
            self.clock.clone(),
        )
    }

    /// Authenticated call, decoding JSON bodies
    ///
    /// # Errors
    /// `Unauthenticated`, refresh errors, or see [`RequestExecutor::execute`].
    pub fn request(
        &mut self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Payload, ApiError> {
        let token = self.access_token()?;
        self.executor.execute(method, path, options.bearer(&token))
    }

    /// Authenticated call returning the body untouched
    ///
    /// # Errors
    /// Same as [`EagleView::request`].
    pub fn request_raw(
        &mut self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<u8>, ApiError> {
        let token = self.access_token()?;
        self.executor.execute_raw(method, path, options.bearer(&token))
    }

    fn install(
        &mut self,
        token: Token,
        credentials: Option<Credentials>,
    ) -> Result<&Token, ApiError> {
        self.session = Session::Token { token, credentials };
        self.token().ok_or(ApiError::Unauthenticated)
    }
}

impl<T, C> fmt::Debug for EagleView<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagleView")
            .field("endpoint", &self.config.endpoint)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, Utc};
    use eagleview_common::resilience::MockClock;
    use serde_json::json;

    use super::*;
    use crate::testing::MockTransport;

    fn clock() -> MockClock {
        MockClock::with_wall_start(SystemTime::UNIX_EPOCH + Duration::from_secs(1_800_000_000))
    }

    fn client(transport: &MockTransport, clock: &MockClock) -> EagleView<MockTransport, MockClock> {
        EagleView::from_parts(
            ClientConfig::with_endpoint("https://example.test"),
            transport.clone(),
            clock.clone(),
        )
    }

    fn credentials() -> Credentials {
        Credentials::new("source", "secret")
    }

    fn now(clock: &MockClock) -> DateTime<Utc> {
        DateTime::<Utc>::from(clock.system_time())
    }

    fn grant(access: &str, refresh: &str) -> serde_json::Value {
        json!({"access_token": access, "refresh_token": refresh, "expires_in": 3600})
    }

    #[test]
    fn test_anonymous_client_refuses_domain_calls() {
        let transport = MockTransport::new();
        let mut client = client(&transport, &clock());

        let err = client.request(Method::GET, "v2/Report/GetReport", RequestOptions::new()).unwrap_err();

        assert!(matches!(err, ApiError::Unauthenticated));
        assert!(client.is_token_expired());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_authenticate_then_call_sends_bearer() {
        let transport = MockTransport::new();
        transport.push_json(200, &grant("abc", "def"));
        transport.push_json(200, &json!({"ReportId": 1}));
        let mut client = client(&transport, &clock());

        client.authenticate("u", "p", credentials()).unwrap();
        client.request(Method::GET, "v2/Report/GetReport", RequestOptions::new()).unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        assert!(!client.is_token_expired());
    }

    #[test]
    fn test_stale_token_with_credentials_refreshes_on_bind() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &grant("new", "def2"));
        let stale = Token::new("old", "def", "bearer", 10, now(&clock));
        let mut client = client(&transport, &clock);

        let bound = client.bind_token(stale, Some(credentials())).unwrap();

        assert_eq!(bound.access_token(), "new");
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_fresh_token_is_bound_without_a_call() {
        let transport = MockTransport::new();
        let clock = clock();
        let fresh = Token::new("abc", "def", "bearer", 3600, now(&clock));
        let mut client = client(&transport, &clock);

        client.bind_token(fresh, Some(credentials())).unwrap();

        assert_eq!(transport.request_count(), 0);
        assert_eq!(client.token().map(Token::access_token), Some("abc"));
    }

    #[test]
    fn test_stale_token_without_credentials_is_kept() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &json!([]));
        let stale = Token::new("old", "def", "bearer", 10, now(&clock));
        let mut client = client(&transport, &clock);

        client.bind_token(stale, None).unwrap();
        client.request(Method::GET, "x", RequestOptions::new()).unwrap();

        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.last_request().unwrap().header("Authorization"), Some("Bearer old"));
        assert!(matches!(client.refresh(), Err(ApiError::Config(_))));
    }

    fn configured_client(
        transport: &MockTransport,
        clock: &MockClock,
    ) -> EagleView<MockTransport, MockClock> {
        let config = ClientConfig {
            credentials: Some(credentials()),
            ..ClientConfig::with_endpoint("https://example.test")
        };
        EagleView::from_parts(config, transport.clone(), clock.clone())
    }

    #[test]
    fn test_stale_token_refreshes_with_configured_credentials() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &grant("new", "def2"));
        let stale = Token::new("old", "def", "bearer", 10, now(&clock));
        let mut client = configured_client(&transport, &clock);

        let bound = client.bind_token(stale, None).unwrap();

        assert_eq!(bound.access_token(), "new");
        assert_eq!(client.credentials(), Some(&credentials()));
        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Basic c291cmNlOnNlY3JldA=="));
    }

    #[test]
    fn test_authenticate_from_config() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &grant("abc", "def"));

        let err = client(&transport, &clock).authenticate_from_config("u", "p").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert_eq!(transport.request_count(), 0);

        let mut client = configured_client(&transport, &clock);
        client.authenticate_from_config("u", "p").unwrap();
        assert_eq!(client.token().map(Token::access_token), Some("abc"));
    }

    #[test]
    fn test_raw_token_ignores_configured_credentials() {
        let transport = MockTransport::new();
        let mut client = configured_client(&transport, &clock());
        client.bind_raw_token("opaque");

        assert!(client.credentials().is_none());
        assert!(matches!(client.refresh(), Err(ApiError::Config(_))));
        assert_eq!(client.access_token().unwrap(), "opaque");
    }

    #[test]
    fn test_access_token_refreshes_lazily() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &grant("abc", "def"));
        transport.push_json(200, &grant("xyz", "uvw"));
        let mut client = client(&transport, &clock);
        client.authenticate("u", "p", credentials()).unwrap();

        assert_eq!(client.access_token().unwrap(), "abc");
        assert_eq!(transport.request_count(), 1);

        clock.advance_secs(3571);
        assert!(client.is_token_expired());
        assert_eq!(client.access_token().unwrap(), "xyz");
        assert_eq!(transport.request_count(), 2);
        assert_eq!(client.token().map(Token::refresh_token), Some("uvw"));
    }

    #[test]
    fn test_raw_token_is_never_refreshed() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_response(401, "Authorization has been denied for this request.");
        let mut client = client(&transport, &clock);
        client.bind_raw_token("opaque");

        clock.advance_secs(1_000_000);
        assert!(!client.is_token_expired());
        let err = client.request(Method::GET, "x", RequestOptions::new()).unwrap_err();

        assert!(err.is_auth_rejection());
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.last_request().unwrap().header("Authorization"), Some("Bearer opaque"));
        assert!(client.token().is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_session() {
        let transport = MockTransport::new();
        let clock = clock();
        transport.push_json(200, &grant("abc", "def"));
        transport.push_response(400, r#"{"error":"invalid_grant"}"#);
        let mut client = client(&transport, &clock);
        client.authenticate("u", "p", credentials()).unwrap();

        let err = client.refresh().unwrap_err();

        assert!(matches!(err, ApiError::Auth { status: 400, .. }));
        assert_eq!(client.token().map(Token::access_token), Some("abc"));
    }

    #[test]
    fn test_retry_policy_uses_client_settings() {
        let transport = MockTransport::new();
        let clock = clock();
        let mut client = client(&transport, &clock);
        client.set_timeout(12);

        let policy = client.retry_policy();
        let mut calls = 0;
        let result: Result<u32, ApiError> = policy
            .retry_until(|| {
                calls += 1;
                Ok::<_, ApiError>(if calls < 3 { 0 } else { 7 })
            })
            .map_err(ApiError::from);

        assert_eq!(result.unwrap(), 7);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5), Duration::from_secs(5)]);
        assert_eq!(client.timeout(), 12);
    }

    #[test]
    fn test_debug_hides_raw_token() {
        let mut client = client(&MockTransport::new(), &clock());
        client.bind_raw_token("opaque-secret");
        assert!(!format!("{client:?}").contains("opaque-secret"));
    }
}
