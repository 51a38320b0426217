use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub use config::ConfigError;

/// Name of the optional YAML file read from a configuration directory.
pub const BASE_CONFIG_FILE: &str = "base.yaml";

/// Prefix for environment overrides, e.g. `APP_API__SERVER_URL`.
pub const ENV_PREFIX: &str = "APP";

/// Logging and trace export settings shared by every binary.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit log lines as flattened JSON instead of the compact text format.
    #[serde(default)]
    pub json: bool,
    /// OTLP gRPC collector endpoint. Trace export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load layered settings: `<config_dir>/base.yaml` (if present), then
/// `APP_`-prefixed environment variables with `__` as the section separator.
///
/// A `.env` file in the working directory is loaded first.
pub fn load<T: DeserializeOwned>(config_dir: Option<&Path>) -> Result<T, ConfigError> {
    dotenvy::dotenv().ok();

    let mut builder = config::Config::builder();

    if let Some(dir) = config_dir {
        builder = builder
            .add_source(config::File::from(dir.join(BASE_CONFIG_FILE)).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}
