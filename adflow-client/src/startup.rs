use crate::cli::Cli;
use crate::config::Settings;
use crate::services::ApiClient;
use crate::session::{FileSessionStore, SessionEvent, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Fold command-line overrides into the loaded settings.
pub fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(server) = &cli.server {
        settings.api.server_url = server.clone();
    }
    if let Some(path) = &cli.session_file {
        settings.session.path = Some(path.clone());
    }
}

/// Client backed by the on-disk session file.
pub fn build_client(settings: &Settings) -> Result<ApiClient> {
    let path = match &settings.session.path {
        Some(path) => path.clone(),
        None => FileSessionStore::default_path()?,
    };
    let store = FileSessionStore::open(&path)
        .with_context(|| format!("Failed to open session file {}", path.display()))?;
    tracing::debug!(path = %path.display(), base_url = %settings.api.base_url(), "building API client");

    let store: Arc<dyn SessionStore> = Arc::new(store);
    ApiClient::new(settings.api.clone(), store).context("Failed to build API client")
}

/// Drain pending session events and report whether the session was ended
/// by the server rather than by the user.
pub fn session_expired(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut expired = false;
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Invalidated => expired = true,
            SessionEvent::LoggedOut | SessionEvent::Established => expired = false,
            SessionEvent::Refreshed => {}
        }
    }
    expired
}
