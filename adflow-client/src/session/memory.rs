use super::{SessionError, SessionKey, SessionStore};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Process-lifetime session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(SessionKey::AccessToken, access_token.to_string());
            entries.insert(SessionKey::RefreshToken, refresh_token.to_string());
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn set(&self, key: SessionKey, value: String) -> Result<(), SessionError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    fn set_many(&self, entries: Vec<(SessionKey, String)>) -> Result<(), SessionError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.extend(entries);
        Ok(())
    }
}
