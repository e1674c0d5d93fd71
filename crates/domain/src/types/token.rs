//! Access tokens issued by the EagleView token endpoint
//!
//! A [`Token`] is built once from a grant response and never mutated
//! afterwards; refreshing produces a brand new instance. Timestamps are
//! normalized to UTC at construction, whatever format the server used.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::TOKEN_REFRESH_MARGIN_SECS;
use crate::errors::{EagleViewError, Result};

/// Token grant response body
///
/// Standard OAuth 2.0 token response (RFC 6749) as returned by `POST /Token`.
/// The server may also report issue/expiry instants, either as
/// `issued_at`/`expires_at` or OWIN-style `.issued`/`.expires`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub expires_in: i64,
    #[serde(default, alias = ".issued")]
    pub issued_at: Option<Value>,
    #[serde(default, alias = ".expires")]
    pub expires_at: Option<Value>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Int(value) => Ok(value),
        Seconds::Float(value) => Ok(value as i64),
        Seconds::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Bearer access token with its refresh token and lifetime
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    access_token: String,
    refresh_token: String,
    token_type: String,
    expires_in: i64,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a token whose expiry is `issued_at + expires_in`
    ///
    /// A lifetime past the representable range yields a token that never
    /// expires.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: token_type.into(),
            expires_in,
            issued_at,
            expires_at: expiry_after(issued_at, expires_in).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Build a token from a grant response received at `now`
    ///
    /// Server-supplied instants win over locally computed ones.
    ///
    /// # Errors
    /// Returns `EagleViewError::InvalidInput` if a server-supplied timestamp
    /// cannot be parsed or `expires_in` is out of range.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        let issued_at = match response.issued_at.as_ref() {
            Some(value) if !value.is_null() => parse_timestamp(value)?,
            _ => now,
        };
        let expires_at = match response.expires_at.as_ref() {
            Some(value) if !value.is_null() => parse_timestamp(value)?,
            _ => expiry_after(issued_at, response.expires_in).ok_or_else(|| {
                EagleViewError::InvalidInput(format!(
                    "expires_in out of range: {}",
                    response.expires_in
                ))
            })?,
        };

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            token_type: response.token_type,
            expires_in: response.expires_in,
            issued_at,
            expires_at,
        })
    }

    /// Same token with a different refresh token
    #[must_use]
    pub fn with_refresh_token(self, refresh_token: impl Into<String>) -> Self {
        Self { refresh_token: refresh_token.into(), ..self }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    #[must_use]
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header of authenticated calls
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Whether the token must be refreshed before being used at `now`
    ///
    /// True once `now` is within [`TOKEN_REFRESH_MARGIN_SECS`] of
    /// `expires_at`, and for every instant after it.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now.checked_add_signed(Duration::seconds(TOKEN_REFRESH_MARGIN_SECS))
            .map_or(true, |deadline| deadline > self.expires_at)
    }

    /// Seconds left until `expires_at` (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn expiry_after(issued_at: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in).and_then(|lifetime| issued_at.checked_add_signed(lifetime))
}

/// Parse a server timestamp into UTC
///
/// Accepts RFC 3339, RFC 2822/1123 (`Mon, 19 Oct 2026 10:00:00 GMT`), naive
/// ISO-8601 (assumed UTC) and unix seconds, either as a number or a string.
///
/// # Errors
/// Returns `EagleViewError::InvalidInput` for any other shape.
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    let invalid = || EagleViewError::InvalidInput(format!("unrecognized timestamp: {value}"));

    match value {
        Value::Number(number) => {
            number.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)).ok_or_else(invalid)
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                return Ok(parsed.with_timezone(&Utc));
            }
            if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
                return Ok(parsed.with_timezone(&Utc));
            }
            if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                return Ok(parsed.and_utc());
            }
            text.parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}
