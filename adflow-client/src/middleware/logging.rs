use super::{Middleware, Next};
use crate::error::ApiError;
use crate::services::request::{ApiRequest, ApiResponse};
use adflow_core::observability::REQUEST_ID_HEADER;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use std::time::Instant;
use uuid::Uuid;

/// Tags each request with an `x-request-id` and logs its outcome and latency.
#[derive(Debug, Default)]
pub struct RequestLogging;

#[async_trait]
impl Middleware for RequestLogging {
    async fn handle(
        &self,
        mut request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            request.headers_mut().insert(REQUEST_ID_HEADER, header_value);
        }

        let method = request.method().clone();
        let path = request.path().to_string();
        let start = Instant::now();

        let outcome = next.run(request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(response) => tracing::debug!(
                %method,
                %path,
                %request_id,
                status = response.status().as_u16(),
                elapsed_ms,
                "request completed"
            ),
            Err(e) => tracing::warn!(
                %method,
                %path,
                %request_id,
                status = e.status().map(|s| s.as_u16()),
                elapsed_ms,
                "request failed: {}",
                e
            ),
        }

        outcome
    }
}
