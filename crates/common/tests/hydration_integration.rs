//! Integration tests for payload hydration
//!
//! Exercises the public hydration API the way resource shapes use it:
//! fillers registered per key, nested collections and raw round-trips.

#![cfg(feature = "foundation")]

use eagleview_common::hydrate::{hydrate, hydrate_collection, Fillers, HydrationError, Shape};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Person {
    #[serde(skip)]
    #[allow(non_snake_case)]
    FIRST_NAME: Option<String>,
}

impl Shape for Person {
    fn register(fillers: &mut Fillers<Self>) {
        fillers.on("first_name", |person, value| {
            person.FIRST_NAME = value.as_str().map(str::to_uppercase);
            Ok(())
        });
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Structure {
    name: String,
    parent: Option<String>,
}

impl Shape for Structure {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Parcel {
    id: u64,
    #[serde(skip)]
    structures: Vec<eagleview_common::Resource<Structure>>,
}

impl Shape for Parcel {
    fn register(fillers: &mut Fillers<Self>) {
        fillers.on("structures", |parcel, value| {
            let mut extra = Map::new();
            extra.insert("parent".to_string(), json!("parcel"));
            parcel.structures = hydrate_collection(value, &extra)?;
            Ok(())
        });
    }
}

/// A filler transforms its key while the raw payload keeps the original
/// value and keys the shape never declared.
#[test]
fn test_filler_output_and_raw_attributes_coexist() {
    let person = hydrate::<Person>(json!({"first_name": "Ann", "extra_field": 1})).unwrap();

    assert_eq!(person.FIRST_NAME.as_deref(), Some("ANN"));
    assert_eq!(person.attributes()["first_name"], json!("Ann"));
    assert_eq!(person.attributes()["extra_field"], json!(1));
}

#[test]
fn test_round_trip_reproduces_payload() {
    let payload = json!({"first_name": "Ann", "extra_field": 1, "tags": ["a", "b"]});
    let person = hydrate::<Person>(payload.clone()).unwrap();

    assert_eq!(serde_json::to_value(&person).unwrap(), payload);
    let rendered: Value = serde_json::from_str(&person.to_string()).unwrap();
    assert_eq!(rendered, payload);
    assert_eq!(Value::Object(person.to_map()), payload);
}

#[test]
fn test_nested_collection_receives_parent_context() {
    let parcel = hydrate::<Parcel>(json!({
        "id": 42,
        "structures": [
            {"name": "house"},
            {"name": "garage", "parent": "lot-7"}
        ]
    }))
    .unwrap();

    assert_eq!(parcel.id, 42);
    assert_eq!(parcel.structures.len(), 2);
    assert_eq!(parcel.structures[0].name, "house");
    assert_eq!(parcel.structures[0].parent.as_deref(), Some("parcel"));
    assert_eq!(parcel.structures[1].parent.as_deref(), Some("lot-7"));
    assert!(parcel.structures[1].attribute("parent").is_some());
}

#[test]
fn test_nested_errors_surface_from_filler() {
    let err = hydrate::<Parcel>(json!({"id": 1, "structures": "none"})).unwrap_err();
    assert!(matches!(err, HydrationError::NotACollection { .. }));
}
