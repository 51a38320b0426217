//! Session store persisted as a JSON file.
//!
//! The file is written with restricted permissions (0600) because it holds
//! bearer tokens. Contents are loaded once when the store is opened and
//! written through on every mutation.

use super::{SessionError, SessionKey, SessionStore};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Session filename inside the AdFlow home directory.
const SESSION_FILE: &str = "session.json";

#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// `$ADFLOW_HOME/session.json`, or `~/.config/adflow/session.json`.
    pub fn default_path() -> Result<PathBuf, SessionError> {
        if let Ok(home) = std::env::var("ADFLOW_HOME") {
            return Ok(PathBuf::from(home).join(SESSION_FILE));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("adflow").join(SESSION_FILE))
            .ok_or(SessionError::NoHomeDir)
    }

    /// Open the store at `path`. A missing file is an empty session.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                SessionError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(SessionError::Io {
                    action: "read",
                    path,
                    source,
                })
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                action: "create directory for",
                path: self.path.clone(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let io_err = |source| SessionError::Io {
            action: "write",
            path: self.path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
    }

    fn set(&self, key: SessionKey, value: String) -> Result<(), SessionError> {
        self.set_many(vec![(key, value)])
    }

    fn set_many(&self, entries: Vec<(SessionKey, String)>) -> Result<(), SessionError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            guard.insert(key.as_str().to_string(), value);
        }
        self.persist(&guard)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        // Memory follows the file so a failed removal is not hidden until
        // the next run.
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionError::Io {
                    action: "remove",
                    path: self.path.clone(),
                    source,
                })
            }
        }
        guard.clear();
        Ok(())
    }
}
