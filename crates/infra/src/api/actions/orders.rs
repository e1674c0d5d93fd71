use eagleview_common::resilience::Clock;
use eagleview_domain::constants::PATH_PLACE_ORDER;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::api::client::EagleView;
use crate::api::errors::ApiError;
use crate::api::executor::RequestOptions;
use crate::http::HttpTransport;

impl<T: HttpTransport, C: Clock + Clone> EagleView<T, C> {
    /// Place a measurement order
    ///
    /// A successful call returns the new report id, among other fields.
    ///
    /// # Errors
    /// `Validation` when the order is incomplete, or any request error.
    pub fn place_order<P: Serialize + ?Sized>(&mut self, payload: &P) -> Result<Value, ApiError> {
        let options = RequestOptions::new().json_from(payload)?;
        self.request(Method::POST, PATH_PLACE_ORDER, options)?.into_json()
    }
}

#[cfg(test)]
mod tests {
    use eagleview_common::resilience::MockClock;
    use eagleview_domain::{ClientConfig, MeasurementRequest};
    use serde_json::json;

    use super::*;
    use crate::http::RequestBody;
    use crate::testing::MockTransport;

    fn client(transport: &MockTransport) -> EagleView<MockTransport, MockClock> {
        let mut client = EagleView::from_parts(
            ClientConfig::with_endpoint("https://example.test"),
            transport.clone(),
            MockClock::new(),
        );
        client.bind_raw_token("opaque");
        client
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Order {
        address: &'static str,
        measurement_instruction_type: MeasurementRequest,
    }

    #[test]
    fn test_order_is_sent_as_json() {
        let transport = MockTransport::new();
        transport.push_json(200, &json!({"OrderId": 7, "ReportIds": [101]}));
        let order = Order {
            address: "1 Main St",
            measurement_instruction_type: MeasurementRequest::PrimaryStructureOnly,
        };

        let placed = client(&transport).place_order(&order).unwrap();

        assert_eq!(placed["ReportIds"], json!([101]));
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://example.test/v2/Order/PlaceOrder");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"Address": "1 Main St", "MeasurementInstructionType": 2}))
        );
    }

    #[test]
    fn test_validation_failure_keeps_field_errors() {
        let transport = MockTransport::new();
        transport.push_response(422, r#"{"Address":["The Address field is required."]}"#);

        let err = client(&transport).place_order(&json!({})).unwrap_err();

        assert_eq!(
            err.validation_errors(),
            Some(&json!({"Address": ["The Address field is required."]}))
        );
    }
}
