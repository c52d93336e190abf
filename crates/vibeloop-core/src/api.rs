//! Backend REST client: per-entity resource fetchers and mutations.
//!
//! Every operation is a single request with no automatic retry; the
//! caller decides. Failures are classified as network, auth (401/403),
//! not-found, or API errors. Ordering and pagination are
//! server-determined; results are never re-sorted client-side.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::{build_client, check_response, normalize_base_url};
use crate::models::{Comment, RecentSearch, Reel, ReelId, SearchResult, UserId, UserProfile};

/// HTTP client for the Vibeloop backend API.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

/// Fields a user may edit on their own profile.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            client: build_client()?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Profiles ----------------------------------------------------------

    /// Fetch a user profile. The token is optional: public profiles render
    /// for signed-out viewers too.
    pub async fn fetch_profile(&self, token: Option<&str>, user: &UserId) -> Result<UserProfile> {
        let mut request = self
            .client
            .get(format!("{}/users/profile/{}", self.base_url, user));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = check_response(request.send().await?).await?;
        let envelope = response.json::<DataEnvelope<UserProfile>>().await?;
        Ok(envelope.data)
    }

    pub async fn update_profile(
        &self,
        token: &str,
        user: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile> {
        let response = self
            .client
            .put(format!("{}/users/profile/update/{}", self.base_url, user))
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        let envelope = check_response(response)
            .await?
            .json::<DataEnvelope<UserProfile>>()
            .await?;
        Ok(envelope.data)
    }

    /// Replace the signed-in user's selected vibe tags.
    pub async fn update_vibes(&self, token: &str, vibes: &[String]) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/users/vibe", self.base_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "vibe": vibes }))
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    pub async fn follow_user(&self, token: &str, target: &UserId) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/users/follow/{}", self.base_url, target))
            .bearer_auth(token)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    pub async fn unfollow_user(&self, token: &str, target: &UserId) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/users/unfollow/{}", self.base_url, target))
            .bearer_auth(token)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    // -- Reels -------------------------------------------------------------

    /// Global reel feed, server-ordered.
    pub async fn fetch_all_reels(&self) -> Result<Vec<Reel>> {
        let response = self
            .client
            .get(format!("{}/reels/all", self.base_url))
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    /// Reels posted by one user.
    pub async fn fetch_user_reels(&self, user: &UserId) -> Result<Vec<Reel>> {
        let response = self
            .client
            .get(format!("{}/reels/user/{}", self.base_url, user))
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    /// Register an already-uploaded video with the backend.
    pub async fn register_reel(&self, token: &str, video_url: &str, caption: &str) -> Result<Reel> {
        let payload = serde_json::json!({
            "videoUrl": video_url,
            "caption": caption,
        });
        let response = self
            .client
            .post(format!("{}/reels/upload", self.base_url))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    /// Toggle the signed-in user's like on a reel.
    ///
    /// Returns the authoritative like set after the toggle.
    pub async fn toggle_like(&self, token: &str, reel: &ReelId) -> Result<Vec<UserId>> {
        let response = self
            .client
            .put(format!("{}/reels/like/{}", self.base_url, reel))
            .bearer_auth(token)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<LikeResponse>()
            .await?;
        Ok(payload.likes)
    }

    /// Post a comment. The caller validates non-empty text first.
    pub async fn post_comment(&self, token: &str, reel: &ReelId, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("comment must not be empty".into()));
        }
        let response = self
            .client
            .post(format!("{}/reels/comment/{}", self.base_url, reel))
            .bearer_auth(token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    // -- Search ------------------------------------------------------------

    /// Search users by name or vibe tag.
    pub async fn search_users(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(format!(
                "{}/users/search?q={}",
                self.base_url,
                urlencoding::encode(query.trim())
            ))
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    pub async fn fetch_recent_searches(&self, token: &str) -> Result<Vec<RecentSearch>> {
        let response = self
            .client
            .get(format!("{}/users/recent-search", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<RecentResponse>()
            .await?;
        Ok(payload.recent)
    }

    /// Record a profile selection as a recent search.
    pub async fn add_recent_search(&self, token: &str, user: &UserId) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/users/recent-search", self.base_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "userId": user }))
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    pub async fn remove_recent_search(&self, token: &str, user: &UserId) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/users/recent-search/{}", self.base_url, user))
            .bearer_auth(token)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    pub async fn clear_recent_searches(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/users/recent-search", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct LikeResponse {
    likes: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
struct RecentResponse {
    recent: Vec<RecentSearch>,
}
