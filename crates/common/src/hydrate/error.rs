use thiserror::Error;

/// Result type for hydration
pub type HydrationResult<T> = Result<T, HydrationError>;

/// Failures while turning a decoded payload into a typed shape
#[derive(Debug, Error)]
pub enum HydrationError {
    /// A single resource was hydrated from something other than an object
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// A collection was hydrated from something other than an array or object
    #[error("expected a JSON array, found {found}")]
    NotACollection { found: &'static str },

    /// The direct (non-filler) fields did not match the shape
    #[error("failed to deserialize {shape}: {source}")]
    Deserialize {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A registered filler rejected its value
    #[error("failed to fill `{key}`: {message}")]
    Transform { key: String, message: String },
}

impl HydrationError {
    /// Build a `Transform` error, the usual failure of a filler
    pub fn transform(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transform { key: key.into(), message: message.into() }
    }
}

/// Human-readable JSON type name used in error messages
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
