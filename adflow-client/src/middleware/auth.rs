use super::{Middleware, Next};
use crate::error::ApiError;
use crate::models::user::RefreshResponse;
use crate::services::request::{ApiRequest, ApiResponse};
use crate::session::{SessionEvent, SessionEvents, SessionKey, SessionStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Adds `Authorization: Bearer <access_token>` from the session store.
pub struct AttachAccessToken {
    store: Arc<dyn SessionStore>,
}

impl AttachAccessToken {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Middleware for AttachAccessToken {
    async fn handle(
        &self,
        mut request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        if request.authenticates() && !request.has_authorization() {
            if let Some(token) = self.store.access_token() {
                request.set_bearer(&token);
            }
        }
        next.run(request).await
    }
}

/// Recovers from an expired access token.
///
/// On a 401 the refresh token is exchanged for a new access token and the
/// request is replayed once. When that is impossible, or the refresh itself
/// fails, the session is cleared and [`SessionEvent::Invalidated`] is
/// published. The caller always receives the outcome of the last attempt.
pub struct RefreshOnUnauthorized {
    store: Arc<dyn SessionStore>,
    events: SessionEvents,
    in_flight: Mutex<()>,
}

impl RefreshOnUnauthorized {
    pub fn new(store: Arc<dyn SessionStore>, events: SessionEvents) -> Self {
        Self {
            store,
            events,
            in_flight: Mutex::new(()),
        }
    }

    fn eligible(&self, request: &ApiRequest) -> bool {
        request.authenticates()
            && !request.is_retried()
            && request.path() != REFRESH_PATH
            && self.store.refresh_token().is_some()
    }

    /// Obtain a fresh access token, or reuse one another request just got.
    async fn refresh(&self, sent_with: Option<&str>, next: Next<'_>) -> Option<String> {
        let _guard = self.in_flight.lock().await;

        if let (Some(sent), Some(current)) = (sent_with, self.store.access_token()) {
            if sent != current {
                tracing::debug!("access token already refreshed by a concurrent request");
                return Some(current);
            }
        }

        let refresh_token = self.store.refresh_token()?;
        let call = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .with_bearer(&refresh_token);

        let response = match next.run(call).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(status = ?e.status(), "Token refresh failed: {}", e);
                return None;
            }
        };

        let tokens: RefreshResponse = match response.json() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("Token refresh returned an unreadable body: {}", e);
                return None;
            }
        };
        let access_token = match tokens.access_token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                tracing::warn!("Token refresh response carried no access token");
                return None;
            }
        };

        let mut entries = vec![(SessionKey::AccessToken, access_token.clone())];
        if let Some(rotated) = tokens.refresh_token.filter(|t| !t.is_empty()) {
            entries.push((SessionKey::RefreshToken, rotated));
        }
        if let Err(e) = self.store.set_many(entries) {
            tracing::warn!("Failed to persist refreshed token: {}", e);
        }

        self.events.emit(SessionEvent::Refreshed);
        tracing::info!("Access token refreshed");
        Some(access_token)
    }

    fn invalidate(&self) {
        tracing::info!("Session is no longer valid; clearing stored credentials");
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear session store: {}", e);
        }
        self.events.emit(SessionEvent::Invalidated);
    }
}

#[async_trait]
impl Middleware for RefreshOnUnauthorized {
    async fn handle(
        &self,
        mut request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let mut outcome = next.run(request.clone()).await;

        loop {
            if !matches!(&outcome, Err(e) if e.is_unauthorized()) {
                return outcome;
            }

            if !self.eligible(&request) {
                self.invalidate();
                return outcome;
            }

            request.mark_retried();
            let sent_with = request.bearer_token().map(str::to_owned);

            match self.refresh(sent_with.as_deref(), next).await {
                Some(token) => {
                    tracing::debug!(path = %request.path(), "Retrying request with refreshed token");
                    request.set_bearer(&token);
                    outcome = next.run(request.clone()).await;
                }
                None => {
                    self.invalidate();
                    return outcome;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::testing::ScriptedTransport;
    use reqwest::StatusCode;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    /// Accepts `good` as the access token; `/auth/refresh` hands out `good`
    /// when presented with `refresh-1`.
    fn server(request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let bearer = request.bearer_token();
        if request.path() == REFRESH_PATH {
            return match bearer {
                Some("refresh-1") => Ok(ScriptedTransport::json(
                    StatusCode::OK,
                    r#"{"success": true, "access_token": "good"}"#,
                )),
                _ => Err(ScriptedTransport::status(StatusCode::UNAUTHORIZED)),
            };
        }
        match bearer {
            Some("good") => Ok(ScriptedTransport::json(StatusCode::OK, r#"{"ok": true}"#)),
            _ => Err(ScriptedTransport::status(StatusCode::UNAUTHORIZED)),
        }
    }

    fn chain(store: &Arc<MemorySessionStore>, events: &SessionEvents) -> Vec<Arc<dyn Middleware>> {
        let store: Arc<dyn SessionStore> = store.clone();
        vec![
            Arc::new(AttachAccessToken::new(store.clone())),
            Arc::new(RefreshOnUnauthorized::new(store, events.clone())),
        ]
    }

    #[tokio::test]
    async fn test_attaches_stored_token() {
        let store = Arc::new(MemorySessionStore::with_tokens("good", "refresh-1"));
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(server);

        Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/dashboard"))
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].bearer_token(), Some("good"));
    }

    #[tokio::test]
    async fn test_no_token_no_header() {
        let store = Arc::new(MemorySessionStore::new());
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(|_| Ok(ScriptedTransport::json(StatusCode::OK, "{}")));

        Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/platforms"))
            .await
            .unwrap();

        assert!(!transport.requests()[0].has_authorization());
    }

    #[tokio::test]
    async fn test_anonymous_and_explicit_headers_are_left_alone() {
        let store = Arc::new(MemorySessionStore::with_tokens("good", "refresh-1"));
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(|_| Ok(ScriptedTransport::json(StatusCode::OK, "{}")));
        let chain = chain(&store, &events);

        Next::new(&transport, &chain)
            .run(ApiRequest::post("/auth/login").anonymous())
            .await
            .unwrap();
        Next::new(&transport, &chain)
            .run(ApiRequest::get("/auth/me").with_bearer("explicit"))
            .await
            .unwrap();

        let sent = transport.requests();
        assert!(!sent[0].has_authorization());
        assert_eq!(sent[1].bearer_token(), Some("explicit"));
    }

    #[tokio::test]
    async fn test_refreshes_once_and_replays() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport = ScriptedTransport::new(server);

        let response = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/campaigns"))
            .await
            .unwrap();

        assert_eq!(response.text(), r#"{"ok": true}"#);
        let sent = transport.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].bearer_token(), Some("expired"));
        assert_eq!(sent[1].path(), REFRESH_PATH);
        assert_eq!(sent[1].bearer_token(), Some("refresh-1"));
        assert_eq!(sent[2].path(), "/campaigns");
        assert_eq!(sent[2].bearer_token(), Some("good"));
        assert!(sent[2].is_retried());

        assert_eq!(store.access_token().as_deref(), Some("good"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Refreshed);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_stored() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(|request| {
            if request.path() == REFRESH_PATH {
                return Ok(ScriptedTransport::json(
                    StatusCode::OK,
                    r#"{"access_token": "good", "refresh_token": "refresh-2"}"#,
                ));
            }
            server(request)
        });

        Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/campaigns"))
            .await
            .unwrap();

        assert_eq!(store.refresh_token().as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "revoked"));
        store
            .set(SessionKey::User, r#"{"id": 1, "username": "maria", "role": "user"}"#.to_string())
            .unwrap();
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport = ScriptedTransport::new(server);

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/campaigns"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.requests_to(REFRESH_PATH), 1);
        assert_eq!(transport.requests_to("/campaigns"), 1);
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_malformed_refresh_response_clears_session() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport = ScriptedTransport::new(|request| {
            if request.path() == REFRESH_PATH {
                return Ok(ScriptedTransport::json(StatusCode::OK, r#"{"success": true}"#));
            }
            server(request)
        });

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/dashboard"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_without_refresh_token_invalidates_immediately() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(SessionKey::AccessToken, "expired".to_string()).unwrap();
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport = ScriptedTransport::new(server);

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/auth/me"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.requests().len(), 1);
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_retried_request_is_not_refreshed_again() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport = ScriptedTransport::new(server);

        let mut request = ApiRequest::get("/campaigns");
        request.mark_retried();
        let err = Next::new(&transport, &chain(&store, &events))
            .run(request)
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.requests_to(REFRESH_PATH), 0);
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_replayed_401_ends_the_session() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        // Refresh succeeds but the resource keeps rejecting the caller.
        let transport = ScriptedTransport::new(|request| {
            if request.path() == REFRESH_PATH {
                return server(request);
            }
            Err(ScriptedTransport::status(StatusCode::UNAUTHORIZED))
        });

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/admin/stats"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.requests_to(REFRESH_PATH), 1);
        assert_eq!(transport.requests_to("/admin/stats"), 2);
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Refreshed);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_refresh_endpoint_401_is_not_refreshed() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let transport =
            ScriptedTransport::new(|_| Err(ScriptedTransport::status(StatusCode::UNAUTHORIZED)));

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::post(REFRESH_PATH).anonymous().with_bearer("refresh-1"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(transport.requests().len(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_is_not_replayed() {
        let store = Arc::new(MemorySessionStore::with_tokens("stale-access", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport =
            ScriptedTransport::new(|_| Err(ScriptedTransport::status(StatusCode::UNAUTHORIZED)));

        let err = Next::new(&transport, &chain(&store, &events))
            .run(
                ApiRequest::post("/auth/login")
                    .anonymous()
                    .with_json(&serde_json::json!({"username": "maria", "password": "wrong-pass"}))
                    .unwrap(),
            )
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path(), "/auth/login");
        assert!(!sent[0].has_authorization());
        assert_eq!(transport.requests_to(REFRESH_PATH), 0);
        assert!(store.is_empty());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_request_sent_without_token_refreshes() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(SessionKey::RefreshToken, "refresh-1".to_string()).unwrap();
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(server);

        Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/campaigns"))
            .await
            .unwrap();

        assert_eq!(transport.requests_to(REFRESH_PATH), 1);
        assert_eq!(transport.requests()[2].bearer_token(), Some("good"));
    }

    #[tokio::test]
    async fn test_other_failures_pass_through() {
        let store = Arc::new(MemorySessionStore::with_tokens("good", "refresh-1"));
        let events = SessionEvents::default();
        let mut rx = events.subscribe();
        let transport =
            ScriptedTransport::new(|_| Err(ScriptedTransport::status(StatusCode::FORBIDDEN)));

        let err = Next::new(&transport, &chain(&store, &events))
            .run(ApiRequest::get("/admin/users"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(store.access_token().as_deref(), Some("good"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let store = Arc::new(MemorySessionStore::with_tokens("expired", "refresh-1"));
        let events = SessionEvents::default();
        let transport = ScriptedTransport::new(server).with_delay(Duration::from_millis(10));
        let chain = chain(&store, &events);
        let next = Next::new(&transport, &chain);

        let (first, second) = tokio::join!(
            next.run(ApiRequest::get("/campaigns")),
            next.run(ApiRequest::get("/dashboard")),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(transport.requests_to(REFRESH_PATH), 1);
        assert_eq!(transport.requests_to("/campaigns"), 2);
        assert_eq!(transport.requests_to("/dashboard"), 2);
        assert_eq!(store.access_token().as_deref(), Some("good"));
    }
}
