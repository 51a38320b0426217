use adflow_core::config::{ConfigError, TelemetrySettings};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Scheme, host and port of the API server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Path prefix every API route lives under.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Per-request timeout handed to the HTTP transport. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            base_path: default_base_path(),
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Server URL joined with the base path, without a trailing slash.
    pub fn base_url(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            server.to_string()
        } else {
            format!("{}/{}", server, path)
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_base_path() -> String {
    "/api/v1".to_string()
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SessionSettings {
    /// Session file location. Defaults to `$ADFLOW_HOME/session.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;

    // Running from the crate directory or from the workspace root
    let configuration_directory = if base_path.ends_with("adflow-client") {
        base_path.join("config")
    } else if base_path.join("adflow-client").join("config").is_dir() {
        base_path.join("adflow-client").join("config")
    } else {
        base_path.join("config")
    };

    adflow_core::config::load(Some(&configuration_directory))
}
