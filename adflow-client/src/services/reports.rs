use super::api_client::ApiClient;
use super::request::ApiRequest;
use crate::error::ApiError;
use crate::models::report::disposition_filename;
use crate::models::{Report, ReportFormat};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Download the campaign report. The body is returned undecoded.
    pub async fn export(&self, format: ReportFormat) -> Result<Report, ApiError> {
        let response = self
            .client
            .execute(ApiRequest::get("/reports/campaigns").with_query("format", format))
            .await?;

        let content_type = response.header(CONTENT_TYPE.as_str()).map(str::to_owned);
        let filename = response
            .header(CONTENT_DISPOSITION.as_str())
            .and_then(disposition_filename);

        Ok(Report {
            format,
            content_type,
            filename,
            content: response.into_body(),
        })
    }
}
