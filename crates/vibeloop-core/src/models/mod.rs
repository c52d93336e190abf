//! Wire models shared across the Vibeloop clients.

pub mod reel;
pub mod search;
pub mod user;

pub use reel::{extract_hashtags, Comment, Reel, ReelId};
pub use search::{RecentSearch, SearchResult};
pub use user::{UserId, UserProfile, UserRef};
