use super::Output;
use crate::services::ApiClient;
use anyhow::{Context, Result};

pub async fn overview(client: &ApiClient) -> Result<Output> {
    let dashboard = client
        .dashboard()
        .overview()
        .await
        .context("Failed to load the dashboard")?;
    Output::json(&dashboard)
}

pub async fn platforms(client: &ApiClient) -> Result<Output> {
    let platforms = client
        .dashboard()
        .platforms()
        .await
        .context("Failed to load platforms")?;
    Output::json(&platforms)
}
