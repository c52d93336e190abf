//! Process-wide session store with pluggable persistence.
//!
//! The store is read by every authenticated view and written only by the
//! sign-in, sign-out, and registration flows. Mutating operations go
//! through [`SessionStore::require_token`], which fails fast with an auth
//! error instead of attempting an unauthenticated request.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{UserId, UserRef};

const SESSION_FILE_NAME: &str = "session.json";

/// An authenticated session: the opaque bearer token plus the signed-in
/// user record, mirroring the two persisted client-state keys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserRef,
}

impl Session {
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Where sessions survive process restarts.
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> Result<Option<Session>>;
    fn save_session(&self, session: &Session) -> Result<()>;
    fn clear_session(&self) -> Result<()>;
}

/// File-backed session store, one JSON record per profile.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default per-user config location, e.g. `~/.config/vibeloop/session.json`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Storage("failed to resolve config directory".into()))?;
        Ok(base.join("vibeloop").join(SESSION_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FileSessionStore {
    fn load_session(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string(session)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-memory persistence for tests and ephemeral shells.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> Result<Option<Session>> {
        let guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Shared handle to the current session.
///
/// Cheap to clone; all clones observe the same session.
#[derive(Clone)]
pub struct SessionStore<P: SessionPersistence> {
    persistence: P,
    current: Arc<RwLock<Option<Session>>>,
}

impl<P: SessionPersistence> SessionStore<P> {
    #[must_use]
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Restore the persisted session at app start, if any.
    pub fn init(&self) -> Result<Option<Session>> {
        let restored = self.persistence.load_session()?;
        let mut guard = self
            .current
            .write()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.clone_from(&restored);
        Ok(restored)
    }

    /// Record a fresh session after login or registration.
    pub fn sign_in(&self, session: Session) -> Result<()> {
        self.persistence.save_session(&session)?;
        let mut guard = self
            .current
            .write()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(session);
        Ok(())
    }

    /// Drop the session and its persisted copy.
    pub fn sign_out(&self) -> Result<()> {
        self.persistence.clear_session()?;
        let mut guard = self
            .current
            .write()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }

    /// Synchronous snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.current().map(|session| session.user.id)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// The bearer token, or a fail-fast auth error when signed out.
    pub fn require_token(&self) -> Result<String> {
        self.current()
            .map(|session| session.token)
            .ok_or_else(|| Error::Auth("sign in to continue".into()))
    }
}
