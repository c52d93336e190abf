//! Aggregate application state handed to an embedding shell.
//!
//! Owns the endpoint configuration, the three HTTP clients, the session
//! store, the notice queue, and the per-screen modal layer. Shells clone
//! the pieces they need; everything here is cheap to clone or lives
//! behind shared ownership.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vibeloop_core::session::FileSessionStore;
use vibeloop_core::{AuthClient, BackendClient, CdnUploader, Config, Result, Session, SessionStore};

use crate::modal::ModalState;
use crate::notify::NoticeQueue;

/// Everything a shell needs to drive the app.
pub struct AppState {
    config: Arc<Config>,
    backend: BackendClient,
    auth: AuthClient,
    uploader: CdnUploader,
    session: SessionStore<FileSessionStore>,
    notices: NoticeQueue,
    modal: Mutex<ModalState>,
}

impl AppState {
    /// Build clients from config and the default session file location.
    pub fn new(config: Config) -> Result<Self> {
        let path = FileSessionStore::default_path()?;
        Self::with_session_store(config, FileSessionStore::new(path))
    }

    pub fn with_session_store(config: Config, persistence: FileSessionStore) -> Result<Self> {
        let config = config.normalized()?;
        let backend = BackendClient::new(&config.api_base_url)?;
        let auth = AuthClient::new(&config.api_base_url)?;
        let uploader = CdnUploader::new(&config.cdn_upload_url, config.cdn_upload_preset.clone())?;
        Ok(Self {
            config: Arc::new(config),
            backend,
            auth,
            uploader,
            session: SessionStore::new(persistence),
            notices: NoticeQueue::new(),
            modal: Mutex::new(ModalState::new()),
        })
    }

    /// Restore a persisted session at startup.
    pub fn restore_session(&self) -> Result<Option<Session>> {
        let restored = self.session.init()?;
        if let Some(session) = &restored {
            tracing::debug!(user = %session.user.id, "restored persisted session");
        }
        Ok(restored)
    }

    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    #[must_use]
    pub fn uploader(&self) -> &CdnUploader {
        &self.uploader
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore<FileSessionStore> {
        &self.session
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Run a closure against the active modal layer.
    pub fn with_modal<T>(&self, apply: impl FnOnce(&mut ModalState) -> T) -> T {
        apply(&mut self.lock_modal())
    }

    #[must_use]
    pub fn modal(&self) -> ModalState {
        self.lock_modal().clone()
    }

    fn lock_modal(&self) -> MutexGuard<'_, ModalState> {
        self.modal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
