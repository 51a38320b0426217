use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Html,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!(
                "unknown report format '{}' (expected csv, html or json)",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloaded campaign report.
#[derive(Debug, Clone)]
pub struct Report {
    pub format: ReportFormat,
    pub content_type: Option<String>,
    /// Filename suggested by the server's `Content-Disposition`.
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

impl Report {
    /// Server-suggested filename, or `adflow_campaigns.<ext>`. Never
    /// contains a directory component.
    pub fn filename_or_default(&self) -> String {
        self.filename
            .as_deref()
            .and_then(bare_filename)
            .unwrap_or_else(|| format!("adflow_campaigns.{}", self.format.as_str()))
    }
}

/// Final path component of `name`, treating both slash styles as separators.
fn bare_filename(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Extract `filename` from a `Content-Disposition` header value.
pub(crate) fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .and_then(|name| bare_filename(name.trim_matches('"')))
}
