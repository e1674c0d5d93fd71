//! Single-call request execution
//!
//! [`RequestExecutor`] resolves a path against the endpoint, sends exactly
//! one request through the transport, classifies any non-2xx status and
//! decodes successful bodies. It never retries and never recovers.

use std::borrow::Cow;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use eagleview_common::resilience::Truthy;
use eagleview_domain::Credentials;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::classifier::classify;
use super::errors::ApiError;
use crate::http::{flatten_query, HttpRequest, HttpResponse, HttpTransport, RequestBody};

/// Decoded body of a successful response
///
/// Bodies that parse as JSON are returned as JSON; anything else (including
/// an empty body) is handed back byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
}

impl Payload {
    pub fn decode(body: Vec<u8>) -> Self {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(body),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// The JSON value, or a `Decode` error for a raw body
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Raw(bytes) => Err(ApiError::Decode(format!(
                "expected a JSON body, got {} raw bytes",
                bytes.len()
            ))),
        }
    }

    /// Deserialize a JSON body into `T`
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.into_json()?).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Body bytes as the server sent them (JSON is re-serialized)
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Raw(bytes) => bytes,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Json(value) => Cow::Owned(value.to_string()),
            Self::Raw(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl Truthy for Payload {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Json(value) => value.is_truthy(),
            Self::Raw(bytes) => !bytes.is_empty() && bytes.as_slice() != b"0",
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// How non-query parameters are encoded in a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Json,
    Form,
}

/// Headers, query and body of one call, built fluently
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters placed by method: query string for GET/DELETE, body otherwise
    pub fn with_params(method: &Method, params: Map<String, Value>, encoding: BodyEncoding) -> Self {
        let options = Self::new();
        if params.is_empty() {
            return options;
        }
        if *method == Method::GET || *method == Method::DELETE {
            return options.query_params(&params);
        }
        match encoding {
            BodyEncoding::Json => options.json(Value::Object(params)),
            BodyEncoding::Form => options.form(flatten_query(&params)),
        }
    }

    /// Set a header, replacing any previous value with the same name
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Basic auth header built from integration credentials
    #[must_use]
    pub fn basic_auth(self, credentials: &Credentials) -> Self {
        let encoded =
            STANDARD.encode(format!("{}:{}", credentials.source_id, credentials.client_secret));
        self.header("Authorization", format!("Basic {encoded}"))
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_params(mut self, params: &Map<String, Value>) -> Self {
        self.query.extend(flatten_query(params));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json_from<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::Decode(format!("failed to serialize request body: {err}")))?;
        Ok(self.json(value))
    }

    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body =
            RequestBody::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

/// Sends one call per invocation and classifies failures
pub struct RequestExecutor<T> {
    endpoint: String,
    transport: T,
}

impl<T: HttpTransport> RequestExecutor<T> {
    pub fn new(endpoint: impl Into<String>, transport: T) -> Self {
        Self { endpoint: endpoint.into(), transport }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for `path`; absolute URLs pass through untouched
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Send the call and decode a 2xx body as JSON when possible
    ///
    /// # Errors
    /// Transport failures, or the classified error for a non-2xx status.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Payload, ApiError> {
        let response = self.send(method, path, options)?;
        Ok(Payload::decode(response.body))
    }

    /// Send the call and return a 2xx body without decoding it
    ///
    /// # Errors
    /// Same as [`RequestExecutor::execute`].
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub fn execute_raw(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<u8>, ApiError> {
        Ok(self.send(method, path, options)?.body)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let mut options = options;
        if !options.has_header("Accept") {
            options = options.header("Accept", "application/json");
        }
        if matches!(options.body, RequestBody::Json(_)) && !options.has_header("Content-Type") {
            options = options.header("Content-Type", "application/json");
        }

        let RequestOptions { headers, query, body } = options;
        let request = HttpRequest { method, url: self.url_for(path), headers, query, body };

        debug!(url = %request.url, "sending request");
        let response = self.transport.send(request)?;

        if !response.is_success() {
            warn!(status = response.status, "request failed");
            return Err(classify(&response));
        }

        debug!(status = response.status, bytes = response.body.len(), "request succeeded");
        Ok(response)
    }
}

impl<T> fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}
