//! Session storage for the tokens and user record of the signed-in account.
//!
//! The store is injected into [`crate::ApiClient`]; every request reads the
//! access token from it, token refresh writes to it, and logout or an
//! unrecoverable 401 clears it.

pub mod events;
pub mod file;
pub mod memory;

pub use events::{SessionEvent, SessionEvents};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::models::{AuthTokens, UserSummary};
use secrecy::ExposeSecret;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Keys persisted by a session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    User,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [
        SessionKey::AccessToken,
        SessionKey::RefreshToken,
        SessionKey::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::AccessToken => "access_token",
            SessionKey::RefreshToken => "refresh_token",
            SessionKey::User => "user",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to {action} session file {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Could not determine home directory; set ADFLOW_HOME")]
    NoHomeDir,
}

/// Key/value storage for the current session.
///
/// Each call is atomic with respect to other calls on the same store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&self, key: SessionKey, value: String) -> Result<(), SessionError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), SessionError>;

    fn set_many(&self, entries: Vec<(SessionKey, String)>) -> Result<(), SessionError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Non-empty access token.
    fn access_token(&self) -> Option<String> {
        self.get(SessionKey::AccessToken).filter(|t| !t.is_empty())
    }

    /// Non-empty refresh token.
    fn refresh_token(&self) -> Option<String> {
        self.get(SessionKey::RefreshToken).filter(|t| !t.is_empty())
    }

    /// Stored user record. A record that no longer parses reads as absent.
    fn user(&self) -> Option<UserSummary> {
        self.get(SessionKey::User)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }
}

/// Persist the tokens and user returned by login or registration.
pub fn store_login(
    store: &dyn SessionStore,
    tokens: &AuthTokens,
    user: &UserSummary,
) -> Result<(), SessionError> {
    store.set_many(vec![
        (
            SessionKey::AccessToken,
            tokens.access_token.expose_secret().clone(),
        ),
        (
            SessionKey::RefreshToken,
            tokens.refresh_token.expose_secret().clone(),
        ),
        (SessionKey::User, serde_json::to_string(user)?),
    ])
}

/// Replace the stored user record.
pub fn store_user(store: &dyn SessionStore, user: &UserSummary) -> Result<(), SessionError> {
    store.set(SessionKey::User, serde_json::to_string(user)?)
}
