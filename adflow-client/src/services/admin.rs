use super::api_client::ApiClient;
use super::request::ApiRequest;
use crate::error::ApiError;
use crate::models::admin::{
    ActivityEnvelope, AdminUserEnvelope, RoleRequest, StatsEnvelope, UpdatedUserEnvelope,
};
use crate::models::user::MessageEnvelope;
use crate::models::{
    ActiveToggle, ActivityEntry, AdminUser, BootstrapResult, Role, RoleChange, SystemStats,
    UpdatedUser, UserPage, UserQuery, UserUpdate,
};

/// The server caps activity listings at this many entries.
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

/// `/admin` endpoints. All but [`AdminApi::bootstrap`] require the admin role.
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<SystemStats, ApiError> {
        let envelope: StatsEnvelope = self.client.get("/admin/stats").await?;
        Ok(envelope.stats)
    }

    /// Most recent optimizer actions across all users.
    pub async fn activity(&self, limit: u32) -> Result<Vec<ActivityEntry>, ApiError> {
        let limit = limit.clamp(1, MAX_ACTIVITY_LIMIT);
        let envelope: ActivityEnvelope = self
            .client
            .execute_json(ApiRequest::get("/admin/activity").with_query("limit", limit))
            .await?;
        Ok(envelope.activity)
    }

    pub async fn users(&self, query: &UserQuery) -> Result<UserPage, ApiError> {
        self.client
            .get_with_query("/admin/users", query.to_pairs())
            .await
    }

    pub async fn user(&self, id: i64) -> Result<AdminUser, ApiError> {
        let envelope: AdminUserEnvelope = self.client.get(&format!("/admin/users/{}", id)).await?;
        Ok(envelope.user)
    }

    /// Change profile fields, role or flags of a user.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<UpdatedUser, ApiError> {
        let envelope: UpdatedUserEnvelope =
            self.client.put(&format!("/admin/users/{}", id), update).await?;
        Ok(envelope.user)
    }

    pub async fn toggle_active(&self, id: i64) -> Result<ActiveToggle, ApiError> {
        self.client
            .post_empty(&format!("/admin/users/{}/toggle-active", id))
            .await
    }

    pub async fn set_role(&self, id: i64, role: &Role) -> Result<RoleChange, ApiError> {
        self.client
            .post(&format!("/admin/users/{}/role", id), &RoleRequest { role })
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<Option<String>, ApiError> {
        let envelope: MessageEnvelope = self.client.delete(&format!("/admin/users/{}", id)).await?;
        Ok(envelope.message)
    }

    /// Promote the current user to admin. Only succeeds while no admin exists.
    pub async fn bootstrap(&self) -> Result<BootstrapResult, ApiError> {
        let result: BootstrapResult = self.client.post_empty("/admin/bootstrap").await?;
        tracing::info!(user_id = result.user.id, "Promoted to administrator");
        Ok(result)
    }
}
