//! Trait seams between the application layer and vibeloop-core's clients.
//!
//! Controllers are generic over these traits so tests can drive them with
//! in-memory fakes instead of a live backend.

use vibeloop_core::auth::{NewAccount, OtpChannel, RegisterOutcome};
use vibeloop_core::cdn::ProgressFn;
use vibeloop_core::models::{Comment, RecentSearch, Reel, ReelId, SearchResult, UserId, UserProfile};
use vibeloop_core::{AuthClient, BackendClient, CdnUploader, Result, Session};

/// The backend's social surface: reads and mutations on profiles, reels,
/// and the search history.
#[allow(async_fn_in_trait)]
pub trait SocialBackend {
    async fn fetch_all_reels(&self) -> Result<Vec<Reel>>;
    async fn fetch_user_reels(&self, user: &UserId) -> Result<Vec<Reel>>;
    async fn fetch_profile(&self, token: Option<&str>, user: &UserId) -> Result<UserProfile>;
    async fn toggle_like(&self, token: &str, reel: &ReelId) -> Result<Vec<UserId>>;
    async fn post_comment(&self, token: &str, reel: &ReelId, text: &str) -> Result<Comment>;
    async fn follow_user(&self, token: &str, target: &UserId) -> Result<()>;
    async fn unfollow_user(&self, token: &str, target: &UserId) -> Result<()>;
    async fn register_reel(&self, token: &str, video_url: &str, caption: &str) -> Result<Reel>;
    async fn search_users(&self, query: &str) -> Result<Vec<SearchResult>>;
    async fn fetch_recent_searches(&self, token: &str) -> Result<Vec<RecentSearch>>;
    async fn add_recent_search(&self, token: &str, user: &UserId) -> Result<()>;
    async fn remove_recent_search(&self, token: &str, user: &UserId) -> Result<()>;
    async fn clear_recent_searches(&self, token: &str) -> Result<()>;
}

impl SocialBackend for BackendClient {
    async fn fetch_all_reels(&self) -> Result<Vec<Reel>> {
        Self::fetch_all_reels(self).await
    }

    async fn fetch_user_reels(&self, user: &UserId) -> Result<Vec<Reel>> {
        Self::fetch_user_reels(self, user).await
    }

    async fn fetch_profile(&self, token: Option<&str>, user: &UserId) -> Result<UserProfile> {
        Self::fetch_profile(self, token, user).await
    }

    async fn toggle_like(&self, token: &str, reel: &ReelId) -> Result<Vec<UserId>> {
        Self::toggle_like(self, token, reel).await
    }

    async fn post_comment(&self, token: &str, reel: &ReelId, text: &str) -> Result<Comment> {
        Self::post_comment(self, token, reel, text).await
    }

    async fn follow_user(&self, token: &str, target: &UserId) -> Result<()> {
        Self::follow_user(self, token, target).await
    }

    async fn unfollow_user(&self, token: &str, target: &UserId) -> Result<()> {
        Self::unfollow_user(self, token, target).await
    }

    async fn register_reel(&self, token: &str, video_url: &str, caption: &str) -> Result<Reel> {
        Self::register_reel(self, token, video_url, caption).await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<SearchResult>> {
        Self::search_users(self, query).await
    }

    async fn fetch_recent_searches(&self, token: &str) -> Result<Vec<RecentSearch>> {
        Self::fetch_recent_searches(self, token).await
    }

    async fn add_recent_search(&self, token: &str, user: &UserId) -> Result<()> {
        Self::add_recent_search(self, token, user).await
    }

    async fn remove_recent_search(&self, token: &str, user: &UserId) -> Result<()> {
        Self::remove_recent_search(self, token, user).await
    }

    async fn clear_recent_searches(&self, token: &str) -> Result<()> {
        Self::clear_recent_searches(self, token).await
    }
}

/// The backend's authentication surface.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<Session>;
    async fn google_login(&self, id_token: &str) -> Result<Session>;
    async fn send_otp(&self, channel: &OtpChannel) -> Result<()>;
    async fn verify_otp(&self, channel: &OtpChannel, code: &str) -> Result<()>;
    async fn register(&self, account: &NewAccount) -> Result<RegisterOutcome>;
}

impl AuthApi for AuthClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        Self::login(self, email, password).await
    }

    async fn google_login(&self, id_token: &str) -> Result<Session> {
        Self::google_login(self, id_token).await
    }

    async fn send_otp(&self, channel: &OtpChannel) -> Result<()> {
        Self::send_otp(self, channel).await
    }

    async fn verify_otp(&self, channel: &OtpChannel, code: &str) -> Result<()> {
        Self::verify_otp(self, channel, code).await
    }

    async fn register(&self, account: &NewAccount) -> Result<RegisterOutcome> {
        Self::register(self, account).await
    }
}

/// The media host's upload surface.
#[allow(async_fn_in_trait)]
pub trait MediaHost {
    /// Upload a video and return its public URL.
    async fn upload_video(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        on_progress: ProgressFn,
    ) -> Result<String>;
}

impl MediaHost for CdnUploader {
    async fn upload_video(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        on_progress: ProgressFn,
    ) -> Result<String> {
        Self::upload_video(self, file_name, content_type, bytes, on_progress).await
    }
}

/// System clipboard access for share links.
///
/// Failure (e.g. clipboard permission denial) is a plain value; callers
/// surface it as a notice, never a panic.
pub trait Clipboard {
    fn set_text(&self, text: &str) -> std::result::Result<(), String>;
}
