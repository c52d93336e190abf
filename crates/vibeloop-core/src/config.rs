//! Client endpoint configuration.
//!
//! Safe-to-ship public endpoints required to bootstrap the backend API,
//! the media CDN, and share links. Secret credentials never live here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::normalize_base_url;
use crate::util::normalize_text_option;

/// Build-provisioned client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend REST API base, e.g. `https://api.example.com/api`.
    pub api_base_url: String,
    /// Unsigned CDN video upload endpoint.
    pub cdn_upload_url: String,
    /// CDN upload preset name.
    pub cdn_upload_preset: String,
    /// Public web origin used when building shareable reel links.
    pub web_base_url: String,
}

impl Config {
    /// Validate and normalize all endpoint URLs.
    pub fn normalized(self) -> Result<Self> {
        let cdn_upload_preset = normalize_text_option(Some(self.cdn_upload_preset))
            .ok_or_else(|| Error::Validation("CDN upload preset must not be empty".into()))?;
        Ok(Self {
            api_base_url: normalize_base_url(&self.api_base_url)?,
            cdn_upload_url: normalize_base_url(&self.cdn_upload_url)?,
            cdn_upload_preset,
            web_base_url: normalize_base_url(&self.web_base_url)?,
        })
    }

    /// Resolve configuration from environment variables.
    ///
    /// Reads `VIBELOOP_API_URL`, `VIBELOOP_CDN_UPLOAD_URL`,
    /// `VIBELOOP_CDN_UPLOAD_PRESET`, and `VIBELOOP_WEB_URL`.
    pub fn from_env() -> Result<Self> {
        Self {
            api_base_url: require_env("VIBELOOP_API_URL")?,
            cdn_upload_url: require_env("VIBELOOP_CDN_UPLOAD_URL")?,
            cdn_upload_preset: require_env("VIBELOOP_CDN_UPLOAD_PRESET")?,
            web_base_url: require_env("VIBELOOP_WEB_URL")?,
        }
        .normalized()
    }

    /// Shareable web link for a reel.
    #[must_use]
    pub fn reel_share_link(&self, reel_id: &str) -> String {
        format!("{}/reel/{}", self.web_base_url, urlencoding::encode(reel_id))
    }
}

fn require_env(name: &str) -> Result<String> {
    normalize_text_option(std::env::var(name).ok())
        .ok_or_else(|| Error::Validation(format!("environment variable {name} is not set")))
}
