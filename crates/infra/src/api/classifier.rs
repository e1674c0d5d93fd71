//! Maps non-2xx responses onto the error taxonomy
//!
//! Checked in this order, first match wins:
//! 1. `422` → `Validation` with the parsed JSON body
//! 2. `404` → `NotFound`
//! 3. `400` → `ActionFailed` with the body text
//! 4. `>= 500` → `Server` with a message embedding status and body
//! 5. anything else → `Unclassified` with status and body text

use serde_json::Value;

use super::errors::ApiError;
use crate::http::HttpResponse;

/// Classify a failed response
pub fn classify(response: &HttpResponse) -> ApiError {
    classify_parts(response.status, &response.body)
}

/// Classify a status code and raw body
pub fn classify_parts(status: u16, body: &[u8]) -> ApiError {
    let text = String::from_utf8_lossy(body).into_owned();

    match status {
        422 => {
            let errors = serde_json::from_slice(body).unwrap_or(Value::Null);
            ApiError::Validation { errors, body: text }
        }
        404 => ApiError::NotFound,
        400 => ApiError::ActionFailed(text),
        status if status >= 500 => ApiError::server(status, text),
        status => ApiError::Unclassified { status, body: text },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_table() {
        let cases: [(u16, fn(&ApiError) -> bool); 6] = [
            (422, |e| matches!(e, ApiError::Validation { .. })),
            (404, |e| matches!(e, ApiError::NotFound)),
            (400, |e| matches!(e, ApiError::ActionFailed(_))),
            (500, |e| matches!(e, ApiError::Server { status: 500, .. })),
            (503, |e| matches!(e, ApiError::Server { status: 503, .. })),
            (418, |e| matches!(e, ApiError::Unclassified { status: 418, .. })),
        ];

        for (status, expected) in cases {
            let err = classify_parts(status, b"body");
            assert!(expected(&err), "status {status} classified as {err:?}");
        }
    }

    #[test]
    fn test_validation_body_is_parsed() {
        let err = classify(&HttpResponse::new(422, r#"{"Zip":["The Zip field is required."]}"#));
        assert_eq!(err.validation_errors(), Some(&json!({"Zip": ["The Zip field is required."]})));
    }

    #[test]
    fn test_unparseable_validation_body_keeps_text() {
        let err = classify_parts(422, b"not json");
        assert_eq!(err.validation_errors(), Some(&Value::Null));
        assert_eq!(err.body(), Some("not json"));
    }

    #[test]
    fn test_not_found_carries_no_payload() {
        let err = classify_parts(404, b"{\"Message\":\"No HTTP resource\"}");
        assert!(matches!(err, ApiError::NotFound));
        assert!(err.body().is_none());
    }

    #[test]
    fn test_action_failed_keeps_raw_body() {
        let err = classify_parts(400, b"Report 17 is not ready\n");
        assert_eq!(err.body(), Some("Report 17 is not ready\n"));
    }

    #[test]
    fn test_auth_statuses_stay_unclassified() {
        for status in [401, 403] {
            let err = classify_parts(status, b"Authorization has been denied");
            assert!(matches!(err, ApiError::Unclassified { .. }));
            assert!(err.is_auth_rejection());
        }
    }

    #[test]
    fn test_redirects_are_unclassified() {
        assert!(matches!(classify_parts(302, b""), ApiError::Unclassified { status: 302, .. }));
    }
}
