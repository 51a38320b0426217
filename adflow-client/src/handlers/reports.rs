use super::Output;
use crate::models::ReportFormat;
use crate::services::ApiClient;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub async fn export(
    client: &ApiClient,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<Output> {
    let report = client
        .reports()
        .export(format)
        .await
        .context("Failed to download the report")?;

    let path = match output {
        Some(path) if path == Path::new("-") => return Ok(Output::Raw(report.content)),
        Some(path) => path,
        None => PathBuf::from(report.filename_or_default()),
    };

    std::fs::write(&path, &report.content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::debug!(path = %path.display(), content_type = ?report.content_type, "report saved");

    Ok(Output::Saved {
        path,
        bytes: report.content.len(),
    })
}
