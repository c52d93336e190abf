//! Optimistic social interactions: like, comment, follow, share.
//!
//! Every mutating operation checks the session token first and fails
//! fast with an auth error before any network traffic. Optimistic edits
//! carry an explicit revert path: a failed request restores the
//! pre-toggle state exactly and surfaces a transient notice.

use std::sync::Arc;

use vibeloop_core::models::{Comment, Reel, UserId, UserProfile};
use vibeloop_core::session::SessionPersistence;
use vibeloop_core::{Config, Error, Result, SessionStore};

use crate::backend::{Clipboard, SocialBackend};
use crate::notify::NoticeQueue;

/// Controller for per-reel and per-profile interactions.
pub struct InteractionController<B, P: SessionPersistence> {
    backend: B,
    session: SessionStore<P>,
    notices: NoticeQueue,
    config: Arc<Config>,
}

impl<B: SocialBackend, P: SessionPersistence> InteractionController<B, P> {
    pub fn new(
        backend: B,
        session: SessionStore<P>,
        notices: NoticeQueue,
        config: Arc<Config>,
    ) -> Self {
        Self {
            backend,
            session,
            notices,
            config,
        }
    }

    /// Toggle the viewer's like on a reel.
    ///
    /// The local like set flips immediately; the request follows. On
    /// success the server's like set is applied as authoritative. On
    /// failure exactly this flip is reverted, so rapid toggles converge
    /// on the last user action.
    pub async fn toggle_like(&self, reel: &mut Reel) -> Result<()> {
        let session = self
            .session
            .current()
            .ok_or_else(|| Error::Auth("sign in to like reels".into()))?;
        let viewer = session.user.id.clone();

        let was_liked = reel.is_liked_by(&viewer);
        if was_liked {
            reel.remove_like(&viewer);
        } else {
            reel.add_like(viewer.clone());
        }

        match self.backend.toggle_like(&session.token, &reel.id).await {
            Ok(likes) => {
                reel.likes = likes;
                Ok(())
            }
            Err(error) => {
                // Revert the optimistic flip.
                if was_liked {
                    reel.add_like(viewer);
                } else {
                    reel.remove_like(&viewer);
                }
                self.notices.error("Couldn't update like, try again");
                Err(error)
            }
        }
    }

    /// Post a comment. Empty or whitespace-only text is rejected before
    /// any network call; on success the server's comment record is
    /// appended to the local list.
    pub async fn post_comment(&self, reel: &mut Reel, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("comment must not be empty".into()));
        }
        let token = self.session.require_token()?;

        match self.backend.post_comment(&token, &reel.id, text).await {
            Ok(comment) => {
                reel.comments.push(comment.clone());
                Ok(comment)
            }
            Err(error) => {
                self.notices.error("Couldn't post comment");
                Err(error)
            }
        }
    }

    /// Follow or unfollow a user, then re-fetch the profile for
    /// authoritative follower/following counts.
    pub async fn set_follow(&self, target: &UserId, follow: bool) -> Result<UserProfile> {
        let token = self.session.require_token()?;

        let outcome = if follow {
            self.backend.follow_user(&token, target).await
        } else {
            self.backend.unfollow_user(&token, target).await
        };
        if let Err(error) = outcome {
            self.notices.error("Couldn't update follow state");
            return Err(error);
        }

        self.backend.fetch_profile(Some(&token), target).await
    }

    /// Copy a shareable reel link to the clipboard. Purely local; a
    /// denied clipboard surfaces as an error notice, never a panic.
    pub fn share_reel<C: Clipboard>(&self, clipboard: &C, reel: &Reel) {
        let link = self.config.reel_share_link(reel.id.as_str());
        match clipboard.set_text(&link) {
            Ok(()) => self.notices.success("Link copied to clipboard"),
            Err(reason) => {
                tracing::warn!(%reason, "clipboard write failed");
                self.notices.error("Couldn't copy link");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::{
        sample_comment, sample_profile, sample_reel, signed_in_store, signed_out_store,
        MockBackend, MockClipboard,
    };

    fn config() -> Arc<Config> {
        Arc::new(Config {
            api_base_url: "https://api.example.com/api".to_string(),
            cdn_upload_url: "https://cdn.example.com/v1/video/upload".to_string(),
            cdn_upload_preset: "reels_upload".to_string(),
            web_base_url: "https://vibeloop.example.com".to_string(),
        })
    }

    fn controller(
        backend: &MockBackend,
        signed_in: bool,
    ) -> InteractionController<&MockBackend, vibeloop_core::session::MemorySessionStore> {
        let session = if signed_in {
            signed_in_store("me")
        } else {
            signed_out_store()
        };
        InteractionController::new(backend, session, NoticeQueue::new(), config())
    }

    #[tokio::test]
    async fn double_toggle_returns_to_original_state() {
        let backend = MockBackend::default();
        // Server applies each toggle in turn.
        backend
            .likes
            .lock()
            .unwrap()
            .push_back(Ok(vec![UserId::from("u2"), UserId::from("me")]));
        backend
            .likes
            .lock()
            .unwrap()
            .push_back(Ok(vec![UserId::from("u2")]));

        let control = controller(&backend, true);
        let mut reel = sample_reel("r1", &["u2"]);
        let original_likes = reel.likes.clone();

        control.toggle_like(&mut reel).await.unwrap();
        assert!(reel.is_liked_by(&UserId::from("me")));
        assert_eq!(reel.like_count(), 2);

        control.toggle_like(&mut reel).await.unwrap();
        assert!(!reel.is_liked_by(&UserId::from("me")));
        assert_eq!(reel.likes, original_likes);
    }

    #[tokio::test]
    async fn failed_like_reverts_the_optimistic_flip() {
        let backend = MockBackend::default();
        backend
            .likes
            .lock()
            .unwrap()
            .push_back(Err(Error::Api("HTTP 500".into())));

        let control = controller(&backend, true);
        let mut reel = sample_reel("r1", &["u2"]);

        let result = control.toggle_like(&mut reel).await;
        assert!(result.is_err());
        assert!(!reel.is_liked_by(&UserId::from("me")));
        assert_eq!(reel.like_count(), 1);
    }

    #[tokio::test]
    async fn like_without_a_session_never_reaches_the_network() {
        let backend = MockBackend::default();
        let control = controller(&backend, false);
        let mut reel = sample_reel("r1", &[]);

        let result = control.toggle_like(&mut reel).await;
        assert!(matches!(result, Err(Error::Auth(_))));
        assert!(backend.call_log().is_empty());
        assert_eq!(reel.like_count(), 0);
    }

    #[tokio::test]
    async fn empty_comment_never_reaches_the_network() {
        let backend = MockBackend::default();
        let control = controller(&backend, true);
        let mut reel = sample_reel("r1", &[]);

        let result = control.post_comment(&mut reel, "   ").await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(backend.call_log().is_empty());
        assert!(reel.comments.is_empty());
    }

    #[tokio::test]
    async fn successful_comment_appends_the_server_record() {
        let backend = MockBackend::default();
        backend
            .comments
            .lock()
            .unwrap()
            .push_back(Ok(sample_comment("nice!", "me")));

        let control = controller(&backend, true);
        let mut reel = sample_reel("r1", &[]);

        let comment = control.post_comment(&mut reel, "  nice!  ").await.unwrap();
        assert_eq!(comment.text, "nice!");
        assert_eq!(reel.comments.len(), 1);
        assert_eq!(backend.call_log(), vec!["post_comment r1 nice!"]);
    }

    #[tokio::test]
    async fn failed_comment_leaves_the_list_unchanged() {
        let backend = MockBackend::default();
        backend
            .comments
            .lock()
            .unwrap()
            .push_back(Err(Error::Api("HTTP 500".into())));

        let control = controller(&backend, true);
        let mut reel = sample_reel("r1", &[]);

        assert!(control.post_comment(&mut reel, "hello").await.is_err());
        assert!(reel.comments.is_empty());
    }

    #[tokio::test]
    async fn follow_refetches_the_authoritative_profile() {
        let backend = MockBackend::default();
        backend.queue_ok_ack();
        backend
            .profiles
            .lock()
            .unwrap()
            .push_back(Ok(sample_profile("author", &["me"])));

        let control = controller(&backend, true);
        let profile = control
            .set_follow(&UserId::from("author"), true)
            .await
            .unwrap();

        assert_eq!(profile.follower_count(), 1);
        assert_eq!(
            backend.call_log(),
            vec!["follow_user author", "fetch_profile author"]
        );
    }

    #[tokio::test]
    async fn follow_without_a_session_fails_fast() {
        let backend = MockBackend::default();
        let control = controller(&backend, false);
        let result = control.set_follow(&UserId::from("author"), true).await;
        assert!(matches!(result, Err(Error::Auth(_))));
        assert!(backend.call_log().is_empty());
    }

    #[test]
    fn share_copies_the_link_and_notifies_success() {
        let backend = MockBackend::default();
        let notices = NoticeQueue::new();
        let control =
            InteractionController::new(&backend, signed_in_store("me"), notices.clone(), config());
        let clipboard = MockClipboard::default();
        let reel = sample_reel("r1", &[]);

        control.share_reel(&clipboard, &reel);
        assert_eq!(
            clipboard.contents.lock().unwrap().as_deref(),
            Some("https://vibeloop.example.com/reel/r1")
        );
        let drained = notices.drain();
        assert_eq!(drained[0].level, NoticeLevel::Success);
    }

    #[test]
    fn share_survives_clipboard_denial() {
        let backend = MockBackend::default();
        let notices = NoticeQueue::new();
        let control =
            InteractionController::new(&backend, signed_in_store("me"), notices.clone(), config());
        let clipboard = MockClipboard {
            deny: true,
            ..Default::default()
        };

        control.share_reel(&clipboard, &sample_reel("r1", &[]));
        let drained = notices.drain();
        assert_eq!(drained[0].level, NoticeLevel::Error);
    }
}
