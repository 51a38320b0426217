use super::request::{ApiRequest, ApiResponse};
use crate::config::ApiSettings;
use crate::error::ApiError;
use adflow_core::observability::TracedClientExt;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Sends a fully prepared request over the wire.
///
/// Non-2xx responses are returned as [`ApiError::Status`], so middleware sees
/// every failure on the error path.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// HTTP transport backed by `reqwest`, with W3C trace context propagation.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = settings.base_url();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            timeout: settings.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&url).map_err(|e| ApiError::InvalidBaseUrl {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(request.path())?;

        let mut outbound = self
            .client
            .traced(request.method().clone(), url)
            .headers(request.headers().clone());

        if !request.query().is_empty() {
            outbound = outbound.query(request.query());
        }
        if let Some(body) = request.body() {
            outbound = outbound.json(body);
        }
        if let Some(timeout) = self.timeout {
            outbound = outbound.timeout(timeout);
        }

        let response = outbound.send().await.map_err(|e| {
            tracing::error!(
                method = %request.method(),
                path = %request.path(),
                "Failed to send request: {}",
                e
            );
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if status.is_success() {
            Ok(ApiResponse::new(status, headers, body.to_vec()))
        } else {
            Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_base_and_path() {
        let transport = ReqwestTransport::new(&ApiSettings::new("http://localhost:5000/")).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000/api/v1");
        assert_eq!(
            transport.url_for("/campaigns/3/analytics").unwrap().as_str(),
            "http://localhost:5000/api/v1/campaigns/3/analytics"
        );
    }

    #[test]
    fn test_rejects_relative_base() {
        let settings = ApiSettings::new("not a url");
        assert!(matches!(
            ReqwestTransport::new(&settings),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }
}
