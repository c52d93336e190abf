//! vibeloop-core - Core library for Vibeloop
//!
//! This crate contains the shared wire models, session store, and backend
//! clients (auth, REST API, media CDN) used by all Vibeloop shells.

pub mod api;
pub mod auth;
pub mod cdn;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod util;

pub use api::BackendClient;
pub use auth::AuthClient;
pub use cdn::CdnUploader;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Comment, Reel, ReelId, UserId, UserProfile, UserRef};
pub use session::{Session, SessionStore};
