//! Shared setup for the adflow-client integration tests.
//!
//! Every test talks to a `wiremock` server standing in for the AdFlow API.

#![allow(dead_code)]

use adflow_client::config::ApiSettings;
use adflow_client::{ApiClient, MemorySessionStore, SessionStore};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";

pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub client: ApiClient,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_store(MemorySessionStore::new()).await
    }

    pub async fn signed_in(access_token: &str, refresh_token: &str) -> Self {
        Self::with_store(MemorySessionStore::with_tokens(access_token, refresh_token)).await
    }

    async fn with_store(store: MemorySessionStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let session: Arc<dyn SessionStore> = store.clone();
        let client = ApiClient::new(ApiSettings::new(server.uri()), session)
            .expect("Failed to build API client");

        Self {
            server,
            store,
            client,
        }
    }
}

/// Full request path for an API route.
pub fn api(route: &str) -> String {
    format!("{}{}", API_PREFIX, route)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "full_name": null,
        "company": null,
        "role": role,
        "is_verified": true,
        "last_login": null
    })
}

pub fn login_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "success": true,
        "user": user_json(1, "maria", "user"),
        "tokens": {
            "access_token": access_token,
            "refresh_token": refresh_token,
            "token_type": "Bearer",
            "expires_in": 3600
        }
    })
}

pub fn campaign_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "total_budget": 10000.0,
        "spent_budget": 2500.0,
        "remaining_budget": 7500.0,
        "objective": "conversions",
        "status": status,
        "start_date": "2026-03-01T00:00:00",
        "end_date": null,
        "metrics": {
            "impressions": 50000, "clicks": 1500, "conversions": 75,
            "ctr": 0.03, "cpc": 1.67, "cpa": 33.33, "roas": 3.5
        },
        "performance_score": 71.5,
        "created_at": "2026-02-20T10:00:00"
    })
}
