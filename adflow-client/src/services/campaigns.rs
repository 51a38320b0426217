use super::api_client::ApiClient;
use super::request::ApiRequest;
use crate::error::ApiError;
use crate::models::campaign::{AnalyticsEnvelope, CampaignEnvelope};
use crate::models::user::MessageEnvelope;
use crate::models::{
    Campaign, CampaignList, CampaignStatus, MetricsUpdate, NewCampaign, OptimizationResult,
};
use validator::Validate;

pub struct CampaignsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CampaignsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Campaigns owned by the current user, optionally filtered by status.
    pub async fn list(&self, status: Option<CampaignStatus>) -> Result<CampaignList, ApiError> {
        let mut request = ApiRequest::get("/campaigns");
        if let Some(status) = status {
            request = request.with_query("status", status);
        }
        self.client.execute_json(request).await
    }

    pub async fn get(&self, id: i64) -> Result<Campaign, ApiError> {
        let envelope: CampaignEnvelope = self.client.get(&format!("/campaigns/{}", id)).await?;
        Ok(envelope.campaign)
    }

    pub async fn create(&self, campaign: &NewCampaign) -> Result<Campaign, ApiError> {
        campaign.validate()?;
        let envelope: CampaignEnvelope = self.client.post("/campaigns", campaign).await?;
        Ok(envelope.campaign)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .execute(ApiRequest::delete(format!("/campaigns/{}", id)))
            .await?;
        Ok(())
    }

    /// Returns the server's confirmation message.
    pub async fn update_metrics(
        &self,
        id: i64,
        metrics: &MetricsUpdate,
    ) -> Result<Option<String>, ApiError> {
        let envelope: MessageEnvelope = self
            .client
            .post(&format!("/campaigns/{}/metrics", id), metrics)
            .await?;
        Ok(envelope.message)
    }

    /// Ask the server to run its optimizer on the campaign.
    pub async fn optimize(&self, id: i64) -> Result<OptimizationResult, ApiError> {
        self.client
            .post_empty(&format!("/campaigns/{}/optimize", id))
            .await
    }

    /// Analytics document; its shape is defined by the server.
    pub async fn analytics(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        let envelope: AnalyticsEnvelope = self
            .client
            .get(&format!("/campaigns/{}/analytics", id))
            .await?;
        Ok(envelope.analytics)
    }
}
