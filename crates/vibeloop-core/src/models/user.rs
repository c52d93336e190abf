//! User profile model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-issued opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Minimal user reference embedded in reels, comments, and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image_url: Option<String>,
}

/// A full user profile as returned by the backend.
///
/// `followers`/`following` are id arrays; counts are derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(rename = "profileImage", default)]
    pub profile_image_url: Option<String>,
    #[serde(rename = "bannerImage", default)]
    pub banner_image_url: Option<String>,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub followers: Vec<UserId>,
    #[serde(default)]
    pub following: Vec<UserId>,
    #[serde(rename = "vibe", default)]
    pub selected_vibes: Vec<String>,
}

impl UserProfile {
    #[must_use]
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    #[must_use]
    pub fn following_count(&self) -> usize {
        self.following.len()
    }

    /// Whether `viewer` currently follows this profile.
    #[must_use]
    pub fn is_followed_by(&self, viewer: &UserId) -> bool {
        self.followers.contains(viewer)
    }

    #[must_use]
    pub fn as_ref_summary(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            name: self.name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}
