//! Search result and recent-search models

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A user row returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image_url: Option<String>,
    #[serde(rename = "vibe", default)]
    pub vibe_tags: Vec<String>,
}

/// A recent-search entry, created server-side on profile selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image_url: Option<String>,
    #[serde(rename = "vibe", default)]
    pub vibe_tags: Vec<String>,
}
