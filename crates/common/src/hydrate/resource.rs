use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A hydrated shape together with the payload it was built from
///
/// Typed access goes through `Deref` to the shape; the untouched payload
/// (including keys the shape ignores) stays available through
/// [`Resource::attributes`]. Serializing or displaying a resource always
/// reproduces the original payload, never the typed fields.
///
/// A resource is read-only once hydrated:
///
/// ```compile_fail
/// use eagleview_common::hydrate::{hydrate, Shape};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Plain {
///     id: u32,
/// }
///
/// impl Shape for Plain {}
///
/// let mut plain = hydrate::<Plain>(json!({"id": 1})).unwrap();
/// plain.id = 2;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<S> {
    fields: S,
    attributes: Map<String, Value>,
}

impl<S> Resource<S> {
    pub(crate) fn new(fields: S, attributes: Map<String, Value>) -> Self {
        Self { fields, attributes }
    }

    /// Typed view of the payload
    pub fn fields(&self) -> &S {
        &self.fields
    }

    /// The original payload, key for key
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// A single original payload value by its raw key
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Owned copy of the original payload
    pub fn to_map(&self) -> Map<String, Value> {
        self.attributes.clone()
    }

    pub fn into_inner(self) -> S {
        self.fields
    }

    pub fn into_parts(self) -> (S, Map<String, Value>) {
        (self.fields, self.attributes)
    }
}

impl<S> Deref for Resource<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl<S> Serialize for Resource<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        self.attributes.serialize(serializer)
    }
}

impl<S> fmt::Display for Resource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.attributes).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
