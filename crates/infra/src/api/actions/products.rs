use eagleview_common::hydrate::{hydrate_collection, Resource};
use eagleview_common::resilience::Clock;
use eagleview_domain::constants::PATH_AVAILABLE_PRODUCTS;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::client::EagleView;
use crate::api::errors::ApiError;
use crate::api::executor::{BodyEncoding, RequestOptions};
use crate::api::resources::Product;
use crate::http::HttpTransport;

impl<T: HttpTransport, C: Clock + Clone> EagleView<T, C> {
    /// Products enabled on the authenticated account
    ///
    /// # Errors
    /// Any request error, or `Hydration` when the listing is malformed.
    pub fn get_available_products(
        &mut self,
        params: Option<Map<String, Value>>,
    ) -> Result<Vec<Resource<Product>>, ApiError> {
        let options =
            RequestOptions::with_params(&Method::GET, params.unwrap_or_default(), BodyEncoding::Json);
        let listing = self.request(Method::GET, PATH_AVAILABLE_PRODUCTS, options)?.into_json()?;
        Ok(hydrate_collection(listing, &Map::new())?)
    }
}
