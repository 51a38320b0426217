use super::request::{ApiRequest, ApiResponse};
use super::transport::{ReqwestTransport, Transport};
use super::{AdminApi, AuthApi, CampaignsApi, DashboardApi, ReportsApi};
use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::middleware::{self, Middleware, Next};
use crate::session::{MemorySessionStore, SessionEvent, SessionEvents, SessionStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Client for the AdFlow API.
///
/// Every call passes through the middleware chain: the stored access token is
/// attached, an expired token is refreshed once, and an unrecoverable 401
/// clears the session and publishes [`SessionEvent::Invalidated`].
///
/// Cloning is cheap; clones share the session store, the refresh lock and the
/// event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    middleware: Vec<Arc<dyn Middleware>>,
    store: Arc<dyn SessionStore>,
    events: SessionEvents,
    base_url: String,
}

impl ApiClient {
    pub fn builder(settings: ApiSettings) -> ApiClientBuilder {
        ApiClientBuilder::new(settings)
    }

    /// Client over HTTP with the default middleware chain.
    pub fn new(settings: ApiSettings, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::builder(settings).session_store(store).build()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    /// Run a request through the middleware chain.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        Next::new(self.inner.transport.as_ref(), &self.inner.middleware)
            .run(request)
            .await
    }

    /// Run a request and decode its JSON body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::get(path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::get(path).with_query_pairs(query))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::post(path).with_json(body)?)
            .await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::post(path)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::put(path).with_json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(ApiRequest::delete(path)).await
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn campaigns(&self) -> CampaignsApi<'_> {
        CampaignsApi::new(self)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("middleware", &self.inner.middleware.len())
            .finish()
    }
}

pub struct ApiClientBuilder {
    settings: ApiSettings,
    store: Option<Arc<dyn SessionStore>>,
    transport: Option<Arc<dyn Transport>>,
    events: SessionEvents,
    extra: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    fn new(settings: ApiSettings) -> Self {
        Self {
            settings,
            store: None,
            transport: None,
            events: SessionEvents::default(),
            extra: Vec::new(),
        }
    }

    /// Defaults to an in-memory store.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Defaults to [`ReqwestTransport`] built from the settings.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn events(mut self, events: SessionEvents) -> Self {
        self.events = events;
        self
    }

    /// Append middleware after the default chain, closest to the transport.
    pub fn layer(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.extra.push(middleware);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.settings)?),
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        let mut chain = middleware::default_chain(store.clone(), self.events.clone());
        chain.extend(self.extra);

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                transport,
                middleware: chain,
                store,
                events: self.events,
                base_url: self.settings.base_url(),
            }),
        })
    }
}
