//! SDK constants
//!
//! Centralized location for the domain-level constants used by every crate.

// Endpoint configuration
pub const DEFAULT_ENDPOINT: &str = "https://webservices-integrations.eagleview.com";
pub const TOKEN_PATH: &str = "Token";

// Timeouts (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 5;

/// A token counts as stale once `now` is within this many seconds of its
/// `expires_at`.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;

// OAuth grant types accepted by the token endpoint
pub const GRANT_TYPE_PASSWORD: &str = "password";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

// Domain endpoint paths
pub const PATH_AVAILABLE_PRODUCTS: &str = "v2/Product/GetAvailableProducts";
pub const PATH_PLACE_ORDER: &str = "v2/Order/PlaceOrder";
pub const PATH_GET_REPORTS: &str = "v2/Report/GetReports";
pub const PATH_GET_REPORT_V2: &str = "v2/Report/GetReport";
pub const PATH_GET_REPORT_V3: &str = "v3/Report/GetReport";
pub const PATH_GET_REPORT_FILE: &str = "v1/File/GetReportFile";
