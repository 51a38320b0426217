use super::api_client::ApiClient;
use crate::error::ApiError;
use crate::models::dashboard::{DashboardEnvelope, PlatformsEnvelope};
use crate::models::{DashboardOverview, PlatformInfo};

pub struct DashboardApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn overview(&self) -> Result<DashboardOverview, ApiError> {
        let envelope: DashboardEnvelope = self.client.get("/dashboard").await?;
        Ok(envelope.dashboard)
    }

    /// Advertising platforms the server can manage campaigns on.
    pub async fn platforms(&self) -> Result<Vec<PlatformInfo>, ApiError> {
        let envelope: PlatformsEnvelope = self.client.get("/platforms").await?;
        Ok(envelope.platforms)
    }
}
