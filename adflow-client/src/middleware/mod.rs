//! Request/response middleware composed around the transport.
//!
//! The client runs an ordered list of middleware. Each one receives the
//! request and a [`Next`] handle for the rest of the chain; calling
//! [`Next::run`] forwards to the following middleware, and after the last
//! one, to the transport. `Next` is `Copy`, so a middleware may run the
//! remainder of the chain more than once (token refresh replays a request).

pub mod auth;
pub mod logging;

pub use auth::{AttachAccessToken, RefreshOnUnauthorized, REFRESH_PATH};
pub use logging::RequestLogging;

use crate::error::ApiError;
use crate::services::request::{ApiRequest, ApiResponse};
use crate::services::transport::Transport;
use crate::session::{SessionEvents, SessionStore};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse, ApiError>;
}

/// Token attachment, refresh on 401, then per-request logging (outermost first).
pub fn default_chain(
    store: Arc<dyn SessionStore>,
    events: SessionEvents,
) -> Vec<Arc<dyn Middleware>> {
    vec![
        Arc::new(AttachAccessToken::new(store.clone())),
        Arc::new(RefreshOnUnauthorized::new(store, events)),
        Arc::new(RequestLogging),
    ]
}

/// The remainder of a middleware chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a dyn Transport,
    chain: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub fn new(transport: &'a dyn Transport, chain: &'a [Arc<dyn Middleware>]) -> Self {
        Self { transport, chain }
    }

    pub async fn run(self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        match self.chain.split_first() {
            Some((current, rest)) => {
                current
                    .handle(
                        request,
                        Next {
                            transport: self.transport,
                            chain: rest,
                        },
                    )
                    .await
            }
            None => self.transport.send(&request).await,
        }
    }
}
