//! Payload hydration into typed shapes
//!
//! A *shape* is a plain `Deserialize` struct describing the typed view of a
//! payload. Most keys map straight onto shape fields through serde. Keys that
//! need custom handling (nested resources, lookups, fan-out into several
//! fields) get a *filler*: a function registered against the key's canonical
//! name that receives the raw value and assigns whatever fields it likes.
//!
//! The filler table is built by [`Shape::register`], so the set of overrides
//! for a shape is visible and type-checked at compile time.
//!
//! ```rust
//! use eagleview_common::hydrate::{hydrate, Fillers, Shape};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct Roof {
//!     pitch: Option<String>,
//!     pitch_degrees: Option<f64>,
//! }
//!
//! impl Shape for Roof {
//!     fn register(fillers: &mut Fillers<Self>) {
//!         fillers.on("pitch", |roof, value| {
//!             let raw = value.as_str().unwrap_or_default().to_string();
//!             roof.pitch_degrees = raw.trim_end_matches("/12").parse::<f64>().ok();
//!             roof.pitch = Some(raw);
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let roof = hydrate::<Roof>(json!({"pitch": "6/12", "area": 2100})).unwrap();
//! assert_eq!(roof.pitch.as_deref(), Some("6/12"));
//! assert_eq!(roof.pitch_degrees, Some(6.0));
//! assert_eq!(roof.attribute("area"), Some(&json!(2100)));
//! ```

mod error;
mod naming;
mod resource;

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use error::{HydrationError, HydrationResult};
pub use naming::canonical_field_name;
pub use resource::Resource;

/// Custom transform for one payload key
pub type FillFn<S> = fn(&mut S, Value) -> HydrationResult<()>;

/// Filler registration table for a shape, keyed by canonical field name
pub struct Fillers<S> {
    table: HashMap<String, FillFn<S>>,
}

impl<S> Fillers<S> {
    pub fn new() -> Self {
        Self { table: HashMap::new() }
    }

    /// Register `fill` for every payload key canonicalizing like `key`
    pub fn on(&mut self, key: &str, fill: FillFn<S>) -> &mut Self {
        self.table.insert(canonical_field_name(key), fill);
        self
    }

    /// Filler for a raw payload key, if one is registered
    pub fn get(&self, raw_key: &str) -> Option<FillFn<S>> {
        self.table.get(&canonical_field_name(raw_key)).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S> Default for Fillers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Fillers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.table.keys().collect();
        keys.sort();
        f.debug_struct("Fillers").field("keys", &keys).finish()
    }
}

/// A typed view that payloads can be hydrated into
///
/// Fields without a filler are deserialized by serde, so shapes should carry
/// `#[serde(default)]` and mark filled fields `#[serde(skip)]`. Unknown keys
/// are ignored by the shape and kept in [`Resource::attributes`].
pub trait Shape: DeserializeOwned {
    /// Register custom transforms; shapes without any keep the default
    fn register(_fillers: &mut Fillers<Self>) {}
}

/// Hydrate a single payload object into `S`
///
/// Direct fields are deserialized first, then each filler runs with its raw
/// value in payload order. The original payload is retained untouched.
///
/// # Errors
/// `NotAnObject` when `payload` is not a JSON object, `Deserialize` when the
/// direct fields do not fit the shape, or whatever a filler returns.
pub fn hydrate<S: Shape>(payload: Value) -> HydrationResult<Resource<S>> {
    match payload {
        Value::Object(attributes) => hydrate_map(attributes),
        other => Err(HydrationError::NotAnObject { found: error::kind_of(&other) }),
    }
}

/// Hydrate an already-unwrapped payload map into `S`
pub fn hydrate_map<S: Shape>(attributes: Map<String, Value>) -> HydrationResult<Resource<S>> {
    let mut fillers = Fillers::new();
    S::register(&mut fillers);

    let mut direct = Map::new();
    let mut deferred = Vec::new();
    for (key, value) in &attributes {
        match fillers.get(key) {
            Some(fill) => deferred.push((fill, value.clone())),
            None => {
                direct.insert(key.clone(), value.clone());
            }
        }
    }

    let mut fields: S = serde_json::from_value(Value::Object(direct))
        .map_err(|source| HydrationError::Deserialize { shape: type_name::<S>(), source })?;

    for (fill, value) in deferred {
        fill(&mut fields, value)?;
    }

    Ok(Resource::new(fields, attributes))
}

/// Hydrate every element of a collection payload into `S`
///
/// Each element is merged with `extra` before hydration; keys already present
/// in the element win. `null` yields an empty collection and an object is
/// treated as a keyed list whose values are the elements.
///
/// # Errors
/// `NotACollection` for scalar payloads, `NotAnObject` when an element is not
/// an object, or any error from hydrating an element.
pub fn hydrate_collection<S: Shape>(
    payload: Value,
    extra: &Map<String, Value>,
) -> HydrationResult<Vec<Resource<S>>> {
    let elements: Vec<Value> = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        Value::Object(keyed) => keyed.into_iter().map(|(_, value)| value).collect(),
        other => return Err(HydrationError::NotACollection { found: error::kind_of(&other) }),
    };

    elements
        .into_iter()
        .map(|element| match element {
            Value::Object(mut attributes) => {
                for (key, value) in extra {
                    attributes.entry(key.clone()).or_insert_with(|| value.clone());
                }
                hydrate_map(attributes)
            }
            other => Err(HydrationError::NotAnObject { found: error::kind_of(&other) }),
        })
        .collect()
}
