use eagleview_common::resilience::Clock;
use eagleview_domain::constants::{
    PATH_GET_REPORTS, PATH_GET_REPORT_FILE, PATH_GET_REPORT_V2, PATH_GET_REPORT_V3,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::api::client::EagleView;
use crate::api::errors::ApiError;
use crate::api::executor::RequestOptions;
use crate::http::HttpTransport;

impl<T: HttpTransport, C: Clock + Clone> EagleView<T, C> {
    /// Search reports on the account, one page at a time
    ///
    /// # Errors
    /// Any request error.
    pub fn get_reports<P: Serialize + ?Sized>(
        &mut self,
        page: u32,
        count: u32,
        payload: &P,
    ) -> Result<Value, ApiError> {
        let options =
            RequestOptions::new().query("page", page).query("count", count).json_from(payload)?;
        self.request(Method::POST, PATH_GET_REPORTS, options)?.into_json()
    }

    /// Status, download link and measurement totals of one report
    ///
    /// # Errors
    /// `NotFound` for an unknown report, or any request error.
    pub fn get_report_v2(&mut self, report_id: u64) -> Result<Value, ApiError> {
        self.get_report(PATH_GET_REPORT_V2, report_id)
    }

    /// Version 3 of [`EagleView::get_report_v2`]
    ///
    /// # Errors
    /// `NotFound` for an unknown report, or any request error.
    pub fn get_report_v3(&mut self, report_id: u64) -> Result<Value, ApiError> {
        self.get_report(PATH_GET_REPORT_V3, report_id)
    }

    /// Download a generated report file
    ///
    /// The body is returned byte for byte. Only file types and formats that
    /// were generated for the report can be fetched.
    ///
    /// # Errors
    /// `ActionFailed` when the file was never generated, or any request error.
    pub fn get_report_file(
        &mut self,
        report_id: u64,
        file_type: u32,
        file_format: u32,
    ) -> Result<Vec<u8>, ApiError> {
        let options = RequestOptions::new()
            .query("reportId", report_id)
            .query("fileType", file_type)
            .query("fileFormat", file_format);
        self.request_raw(Method::GET, PATH_GET_REPORT_FILE, options)
    }

    fn get_report(&mut self, path: &str, report_id: u64) -> Result<Value, ApiError> {
        let options = RequestOptions::new().query("reportId", report_id);
        self.request(Method::GET, path, options)?.into_json()
    }
}
