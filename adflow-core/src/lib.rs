//! adflow-core: Shared infrastructure for the AdFlow client crates.
pub mod config;
pub mod observability;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tracing;
