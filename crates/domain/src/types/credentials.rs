//! Integration credentials issued by the EagleView integrations team

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source id and client secret pair
///
/// Only ever sent as the Basic-auth header of a token grant request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub source_id: String,
    pub client_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(source_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { source_id: source_id.into(), client_secret: client_secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("source_id", &self.source_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("source-1", "top-secret");
        let rendered = format!("{credentials:?}");

        assert!(rendered.contains("source-1"));
        assert!(!rendered.contains("top-secret"));
    }
}
