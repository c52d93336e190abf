//! Reel and comment models

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([a-zA-Z][a-zA-Z0-9_-]*)").expect("hashtag pattern"));

use super::user::{UserId, UserRef};

/// Backend-issued opaque reel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelId(String);

impl ReelId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReelId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// A comment on a reel. Append-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    #[serde(rename = "commentedBy")]
    pub commented_by: UserRef,
}

/// A short video posted by a user.
///
/// Immutable except for `likes` and `comments`, which are patched
/// optimistically client-side and reconciled against the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    #[serde(rename = "_id")]
    pub id: ReelId,
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    pub posted_by: UserRef,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Reel {
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    #[must_use]
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Add a like. `likes` is a set: re-liking never double-counts.
    pub fn add_like(&mut self, user: UserId) {
        if !self.likes.contains(&user) {
            self.likes.push(user);
        }
    }

    pub fn remove_like(&mut self, user: &UserId) {
        self.likes.retain(|liker| liker != user);
    }

    /// Extract #hashtags from the caption.
    #[must_use]
    pub fn hashtags(&self) -> Vec<String> {
        extract_hashtags(&self.caption)
    }
}

/// Extract #hashtags from text.
///
/// Valid tags match the pattern `#[a-zA-Z][a-zA-Z0-9_-]*`. Tags are
/// returned in lowercase and deduplicated.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}
