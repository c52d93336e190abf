//! User search with a trailing-edge debounce and recent-search history.
//!
//! Keystrokes record a pending query; the query is dispatched only once
//! the debounce interval has elapsed with no newer input. Time is passed
//! in by the caller so tests never sleep. Results live in a
//! [`RemoteCell`], so of two overlapping searches the later-issued one
//! wins.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use vibeloop_core::models::{RecentSearch, SearchResult, UserId};
use vibeloop_core::session::SessionPersistence;
use vibeloop_core::{Result, SessionStore};

use crate::backend::SocialBackend;
use crate::remote::{RemoteCell, RemoteData};

/// Pause after the last keystroke before a search is dispatched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

struct PendingQuery {
    text: String,
    entered_at: Instant,
}

/// Controller for the user-search screen.
pub struct SearchController<B, P: SessionPersistence> {
    backend: B,
    session: SessionStore<P>,
    debounce: Duration,
    pending: Mutex<Option<PendingQuery>>,
    results: Mutex<RemoteCell<Vec<SearchResult>>>,
    recents: Mutex<RemoteCell<Vec<RecentSearch>>>,
}

impl<B: SocialBackend, P: SessionPersistence> SearchController<B, P> {
    pub fn new(backend: B, session: SessionStore<P>) -> Self {
        Self::with_debounce(backend, session, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(backend: B, session: SessionStore<P>, debounce: Duration) -> Self {
        Self {
            backend,
            session,
            debounce,
            pending: Mutex::new(None),
            results: Mutex::new(RemoteCell::new()),
            recents: Mutex::new(RemoteCell::new()),
        }
    }

    /// Record a keystroke. A trimmed-empty query cancels any pending
    /// search and clears the result list, which puts the screen back on
    /// its recent-search history.
    pub fn set_query(&self, text: &str, now: Instant) {
        let text = text.trim();
        let mut pending = self.lock_pending();
        if text.is_empty() {
            *pending = None;
            self.lock_results().invalidate();
        } else {
            *pending = Some(PendingQuery {
                text: text.to_string(),
                entered_at: now,
            });
        }
    }

    /// Dispatch the pending query if its debounce interval has elapsed.
    /// The fetch ticket is issued before the returned future runs, so a
    /// later dispatch supersedes this one even if it resolves first.
    pub fn fire_due(&self, now: Instant) -> Option<impl Future<Output = bool> + '_> {
        let query = {
            let mut pending = self.lock_pending();
            let due = matches!(
                pending.as_ref(),
                Some(entry) if now.duration_since(entry.entered_at) >= self.debounce
            );
            if due {
                pending.take().map(|entry| entry.text)
            } else {
                None
            }
        }?;
        let ticket = self.lock_results().begin();
        Some(async move {
            let outcome = self.backend.search_users(&query).await;
            if let Err(error) = &outcome {
                tracing::warn!(%query, %error, "user search failed");
            }
            self.lock_results().resolve(ticket, outcome)
        })
    }

    /// Result list state. `Idle` means the screen shows recents instead.
    #[must_use]
    pub fn results(&self) -> RemoteData<Vec<SearchResult>> {
        self.lock_results().snapshot()
    }

    #[must_use]
    pub fn showing_recents(&self) -> bool {
        matches!(self.lock_results().data(), RemoteData::Idle)
    }

    /// Load the viewer's recent-search history.
    pub fn load_recents(&self) -> impl Future<Output = bool> + '_ {
        let ticket = self.lock_recents().begin();
        async move {
            let outcome = match self.session.require_token() {
                Ok(token) => self.backend.fetch_recent_searches(&token).await,
                Err(error) => Err(error),
            };
            self.lock_recents().resolve(ticket, outcome)
        }
    }

    #[must_use]
    pub fn recents(&self) -> RemoteData<Vec<RecentSearch>> {
        self.lock_recents().snapshot()
    }

    /// Record a tapped search result in the history.
    pub async fn record_selection(&self, user: &UserId) -> Result<()> {
        let token = self.session.require_token()?;
        self.backend.add_recent_search(&token, user).await
    }

    /// Remove one entry from the history, patching the local list on
    /// success.
    pub async fn remove_recent(&self, user: &UserId) -> Result<()> {
        let token = self.session.require_token()?;
        self.backend.remove_recent_search(&token, user).await?;
        let mut recents = self.lock_recents();
        let remaining = match recents.data() {
            RemoteData::Ready(entries) => Some(
                entries
                    .iter()
                    .filter(|entry| &entry.id != user)
                    .cloned()
                    .collect::<Vec<RecentSearch>>(),
            ),
            _ => None,
        };
        if let Some(remaining) = remaining {
            let ticket = recents.begin();
            recents.resolve(ticket, Ok(remaining));
        }
        Ok(())
    }

    /// Wipe the whole history.
    pub async fn clear_recents(&self) -> Result<()> {
        let token = self.session.require_token()?;
        self.backend.clear_recent_searches(&token).await?;
        let mut recents = self.lock_recents();
        let ticket = recents.begin();
        recents.resolve(ticket, Ok(Vec::new()));
        Ok(())
    }

    /// Screen unmount.
    pub fn teardown(&self) {
        *self.lock_pending() = None;
        self.lock_results().invalidate();
        self.lock_recents().invalidate();
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<PendingQuery>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_results(&self) -> MutexGuard<'_, RemoteCell<Vec<SearchResult>>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_recents(&self) -> MutexGuard<'_, RemoteCell<Vec<RecentSearch>>> {
        self.recents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
