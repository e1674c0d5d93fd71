//! Products available to the authenticated account

use eagleview_common::hydrate::{hydrate_collection, Fillers, HydrationError, HydrationResult, Resource, Shape};
use eagleview_domain::MeasurementRequest;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A product entry of `GetAvailableProducts`
///
/// Delivery and add-on products are products themselves and are hydrated
/// recursively. Measurement instruction ids are resolved to
/// [`MeasurementRequest`] values; ids outside the known set are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(rename = "productID")]
    pub product_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "DetailedDescription")]
    pub detailed_description: Option<String>,
    /// Deprecated upstream, usually null
    #[serde(rename = "productGroup")]
    pub product_group: Option<String>,
    #[serde(rename = "isTemporarilyUnavailable")]
    pub is_temporarily_unavailable: Option<bool>,
    #[serde(rename = "priceMin")]
    pub price_min: Option<f64>,
    #[serde(rename = "priceMax")]
    pub price_max: Option<f64>,
    #[serde(rename = "TypeOfStructure")]
    pub type_of_structure: Option<i64>,
    #[serde(rename = "IsRoofProduct")]
    pub is_roof_product: Option<bool>,
    #[serde(rename = "SortOrder")]
    pub sort_order: Option<i64>,
    #[serde(rename = "AllowsUserSubmittedPhotos")]
    pub allows_user_submitted_photos: Option<bool>,

    #[serde(skip)]
    pub delivery_products: Vec<Resource<Product>>,
    #[serde(skip)]
    pub add_on_products: Vec<Resource<Product>>,
    #[serde(skip)]
    pub measurement_instruction_types: Vec<MeasurementRequest>,
}

impl Shape for Product {
    fn register(fillers: &mut Fillers<Self>) {
        fillers
            .on("deliveryProducts", |product, value| {
                product.delivery_products = hydrate_collection(value, &Map::new())?;
                Ok(())
            })
            .on("addOnProducts", |product, value| {
                product.add_on_products = hydrate_collection(value, &Map::new())?;
                Ok(())
            })
            .on("measurementInstructionTypes", fill_measurement_instruction_types);
    }
}

fn fill_measurement_instruction_types(product: &mut Product, value: Value) -> HydrationResult<()> {
    let ids = match value {
        Value::Null => Vec::new(),
        Value::Array(ids) => ids,
        other => {
            return Err(HydrationError::transform(
                "measurementInstructionTypes",
                format!("expected a list of ids, got {other}"),
            ))
        }
    };

    product.measurement_instruction_types =
        ids.iter().filter_map(instruction_id).filter_map(MeasurementRequest::from_value).collect();
    Ok(())
}

/// Numeric id from a number or numeric string
fn instruction_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number.as_f64().filter(|id| id.fract() == 0.0 && *id >= 0.0).map(|id| id as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use eagleview_common::hydrate::hydrate;
    use serde_json::json;

    use super::*;

    fn payload() -> Value {
        json!({
            "productID": 31,
            "name": "Premium",
            "description": "Premium roof report",
            "DetailedDescription": "Full 3D roof measurements",
            "productGroup": null,
            "isTemporarilyUnavailable": false,
            "priceMin": 55.0,
            "priceMax": 90.5,
            "TypeOfStructure": 1,
            "IsRoofProduct": true,
            "SortOrder": 2,
            "AllowsUserSubmittedPhotos": true,
            "deliveryProducts": [
                {"productID": 45, "name": "Regular"},
                {"productID": 8, "name": "Express"}
            ],
            "addOnProducts": [],
            "measurementInstructionTypes": [1, "3", 5, 99]
        })
    }

    #[test]
    fn test_direct_fields() {
        let product = hydrate::<Product>(payload()).unwrap();

        assert_eq!(product.product_id, Some(31));
        assert_eq!(product.name.as_deref(), Some("Premium"));
        assert_eq!(product.detailed_description.as_deref(), Some("Full 3D roof measurements"));
        assert_eq!(product.product_group, None);
        assert_eq!(product.price_max, Some(90.5));
        assert_eq!(product.is_roof_product, Some(true));
    }

    #[test]
    fn test_nested_products_are_hydrated() {
        let product = hydrate::<Product>(payload()).unwrap();

        let names: Vec<_> =
            product.delivery_products.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, ["Regular", "Express"]);
        assert_eq!(product.delivery_products[1].attribute("productID"), Some(&json!(8)));
        assert!(product.add_on_products.is_empty());
    }

    #[test]
    fn test_instruction_types_resolve_and_skip_unknown() {
        let product = hydrate::<Product>(payload()).unwrap();

        assert_eq!(product.measurement_instruction_types, vec![
            MeasurementRequest::PrimaryPlusDetachedGarage,
            MeasurementRequest::AllStructuresOnParcel,
            MeasurementRequest::Other,
        ]);
    }

    #[test]
    fn test_raw_attributes_survive_transforms() {
        let product = hydrate::<Product>(payload()).unwrap();

        assert_eq!(product.attribute("measurementInstructionTypes"), Some(&json!([1, "3", 5, 99])));
        assert_eq!(product.to_map(), payload().as_object().cloned().unwrap());
    }

    #[test]
    fn test_null_collections_are_empty() {
        let product = hydrate::<Product>(json!({
            "productID": 1,
            "deliveryProducts": null,
            "measurementInstructionTypes": null
        }))
        .unwrap();

        assert!(product.delivery_products.is_empty());
        assert!(product.measurement_instruction_types.is_empty());
    }

    #[test]
    fn test_scalar_instruction_types_are_rejected() {
        let err = hydrate::<Product>(json!({"measurementInstructionTypes": 4})).unwrap_err();
        assert!(matches!(err, HydrationError::Transform { .. }));
    }
}
