//! Reel feed and profile view models.
//!
//! Thin async controllers that drive a [`RemoteCell`] through the
//! `SocialBackend` seam. Latest-wins reconciliation and teardown
//! semantics come from the cell; these types only decide what to fetch.

use std::sync::{Mutex, PoisonError};

use vibeloop_core::models::{Reel, UserId, UserProfile};

use crate::backend::SocialBackend;
use crate::remote::{RemoteCell, RemoteData};

/// What a reel feed screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// The global trending feed.
    Global,
    /// Reels posted by one user.
    User(UserId),
}

/// View model for a reel list screen.
pub struct ReelFeed<B> {
    backend: B,
    scope: FeedScope,
    cell: Mutex<RemoteCell<Vec<Reel>>>,
}

impl<B: SocialBackend> ReelFeed<B> {
    pub fn new(backend: B, scope: FeedScope) -> Self {
        Self {
            backend,
            scope,
            cell: Mutex::new(RemoteCell::new()),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> &FeedScope {
        &self.scope
    }

    /// Fetch (or retry) the feed. The ticket is issued at call time, so
    /// of two overlapping loads the later-issued one wins regardless of
    /// completion order. Returns `false` when this response was
    /// superseded by a newer load or a teardown and was discarded.
    pub fn load(&self) -> impl std::future::Future<Output = bool> + '_ {
        let ticket = self.lock().begin();
        async move {
            let outcome = match &self.scope {
                FeedScope::Global => self.backend.fetch_all_reels().await,
                FeedScope::User(user) => self.backend.fetch_user_reels(user).await,
            };
            if let Err(error) = &outcome {
                tracing::warn!(scope = ?self.scope, %error, "feed fetch failed");
            }
            self.lock().resolve(ticket, outcome)
        }
    }

    /// Current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> RemoteData<Vec<Reel>> {
        self.lock().snapshot()
    }

    /// Screen unmount: discard any in-flight response.
    pub fn teardown(&self) {
        self.lock().invalidate();
    }

    /// Replace one reel in a ready feed (post-interaction reconciliation).
    pub fn apply_reel(&self, updated: &Reel) {
        let mut cell = self.lock();
        let patched = match cell.data() {
            RemoteData::Ready(reels) if reels.iter().any(|reel| reel.id == updated.id) => {
                let mut reels = reels.clone();
                for reel in &mut reels {
                    if reel.id == updated.id {
                        *reel = updated.clone();
                    }
                }
                Some(reels)
            }
            _ => None,
        };
        if let Some(reels) = patched {
            let ticket = cell.begin();
            cell.resolve(ticket, Ok(reels));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RemoteCell<Vec<Reel>>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// View model for a profile screen.
pub struct ProfileView<B> {
    backend: B,
    user: UserId,
    cell: Mutex<RemoteCell<UserProfile>>,
}

impl<B: SocialBackend> ProfileView<B> {
    pub fn new(backend: B, user: UserId) -> Self {
        Self {
            backend,
            user,
            cell: Mutex::new(RemoteCell::new()),
        }
    }

    #[must_use]
    pub const fn user(&self) -> &UserId {
        &self.user
    }

    /// Fetch (or retry) the profile; pass a token for viewer-specific
    /// fields. Also used to re-fetch authoritative counts after a
    /// follow/unfollow. The ticket is issued at call time.
    pub fn load<'a>(&'a self, token: Option<&'a str>) -> impl std::future::Future<Output = bool> + 'a {
        let ticket = self.lock().begin();
        async move {
            let outcome = self.backend.fetch_profile(token, &self.user).await;
            if let Err(error) = &outcome {
                tracing::warn!(user = %self.user, %error, "profile fetch failed");
            }
            self.lock().resolve(ticket, outcome)
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> RemoteData<UserProfile> {
        self.lock().snapshot()
    }

    /// Apply an authoritative profile returned by a mutation.
    pub fn apply(&self, profile: UserProfile) {
        let mut cell = self.lock();
        let ticket = cell.begin();
        cell.resolve(ticket, Ok(profile));
    }

    pub fn teardown(&self) {
        self.lock().invalidate();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RemoteCell<UserProfile>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vibeloop_core::Error;

    use super::*;
    use crate::testing::{sample_profile, sample_reel, MockBackend};

    #[tokio::test]
    async fn global_feed_load_reaches_ready() {
        let backend = MockBackend::default();
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("r1", &[])]));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        assert!(feed.load().await);

        match feed.snapshot() {
            RemoteData::Ready(reels) => assert_eq!(reels[0].id.as_str(), "r1"),
            other => panic!("expected ready feed, got {other:?}"),
        }
        assert_eq!(backend.call_log(), vec!["fetch_all_reels"]);
    }

    #[tokio::test]
    async fn empty_feed_is_ready_not_stuck_loading() {
        let backend = MockBackend::default();
        backend.reels.lock().unwrap().push_back(Ok(Vec::new()));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        assert!(feed.load().await);
        assert_eq!(feed.snapshot(), RemoteData::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn failed_load_offers_retry() {
        let backend = MockBackend::default();
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Err(Error::Api("HTTP 502".into())));
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("r1", &[])]));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        assert!(feed.load().await);
        assert!(matches!(feed.snapshot(), RemoteData::Failed(_)));

        // Retry is just another load.
        assert!(feed.load().await);
        assert!(matches!(feed.snapshot(), RemoteData::Ready(_)));
    }

    #[tokio::test]
    async fn later_issued_load_wins_even_when_it_resolves_first() {
        let backend = MockBackend::default();
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("newer", &[])]));
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("older", &[])]));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        let first = feed.load();
        let second = feed.load();

        // The second-issued load completes first and takes the feed.
        assert!(second.await);
        // The first-issued load resolves afterwards and is discarded.
        assert!(!first.await);

        match feed.snapshot() {
            RemoteData::Ready(reels) => assert_eq!(reels[0].id.as_str(), "newer"),
            other => panic!("expected ready feed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn teardown_discards_the_in_flight_response() {
        let backend = MockBackend::default();
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("r1", &[])]));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        let load = feed.load();
        feed.teardown();
        // The response resolves after teardown and must be discarded.
        assert!(!load.await);
        assert_eq!(feed.snapshot(), RemoteData::Idle);
    }

    #[tokio::test]
    async fn user_scope_hits_the_user_endpoint() {
        let backend = MockBackend::default();
        backend.reels.lock().unwrap().push_back(Ok(Vec::new()));

        let feed = ReelFeed::new(&backend, FeedScope::User(UserId::from("u7")));
        feed.load().await;
        assert_eq!(backend.call_log(), vec!["fetch_user_reels u7"]);
    }

    #[tokio::test]
    async fn apply_reel_patches_a_ready_feed() {
        let backend = MockBackend::default();
        backend
            .reels
            .lock()
            .unwrap()
            .push_back(Ok(vec![sample_reel("r1", &[]), sample_reel("r2", &[])]));

        let feed = ReelFeed::new(&backend, FeedScope::Global);
        feed.load().await;

        let updated = sample_reel("r2", &["me"]);
        feed.apply_reel(&updated);

        match feed.snapshot() {
            RemoteData::Ready(reels) => {
                assert_eq!(reels[1].like_count(), 1);
                assert_eq!(reels[0].like_count(), 0);
            }
            other => panic!("expected ready feed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn profile_load_and_apply() {
        let backend = MockBackend::default();
        backend
            .profiles
            .lock()
            .unwrap()
            .push_back(Ok(sample_profile("author", &[])));

        let view = ProfileView::new(&backend, UserId::from("author"));
        assert!(view.load(None).await);

        let refreshed = sample_profile("author", &["me"]);
        view.apply(refreshed);
        match view.snapshot() {
            RemoteData::Ready(profile) => assert_eq!(profile.follower_count(), 1),
            other => panic!("expected ready profile, got {other:?}"),
        }
    }
}
