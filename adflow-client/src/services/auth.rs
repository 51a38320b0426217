use super::api_client::ApiClient;
use super::request::ApiRequest;
use crate::error::ApiError;
use crate::models::user::{MessageEnvelope, UserEnvelope};
use crate::models::{
    AuthSession, ChangePasswordRequest, LoginRequest, RegisterRequest, UserSummary,
};
use crate::session::{store_login, store_user, SessionEvent};
use validator::Validate;

/// `/auth` endpoints. Login and registration store the returned session.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSummary, ApiError> {
        request.validate()?;
        self.establish(ApiRequest::post("/auth/register").anonymous().with_json(request)?)
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<UserSummary, ApiError> {
        request.validate()?;
        self.establish(ApiRequest::post("/auth/login").anonymous().with_json(request)?)
            .await
    }

    async fn establish(&self, request: ApiRequest) -> Result<UserSummary, ApiError> {
        let session: AuthSession = self.client.execute_json(request).await?;
        store_login(self.client.session().as_ref(), &session.tokens, &session.user)?;

        tracing::info!(user_id = session.user.id, role = %session.user.role, "Signed in");
        self.client.events().emit(SessionEvent::Established);
        Ok(session.user)
    }

    /// Current user; also refreshes the stored user record.
    pub async fn me(&self) -> Result<UserSummary, ApiError> {
        let envelope: UserEnvelope = self.client.get("/auth/me").await?;
        store_user(self.client.session().as_ref(), &envelope.user)?;
        Ok(envelope.user)
    }

    /// Ends the session server-side when possible. The local session is
    /// cleared regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self
            .client
            .execute(ApiRequest::post("/auth/logout"))
            .await
        {
            tracing::warn!("Logout request failed: {}", e);
        }

        self.client.session().clear()?;
        self.client.events().emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Returns the server's confirmation message.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Option<String>, ApiError> {
        request.validate()?;
        let envelope: MessageEnvelope = self.client.post("/auth/change-password", request).await?;
        Ok(envelope.message)
    }
}
