//! Media CDN upload client.
//!
//! Streams a video file to a Cloudinary-style unsigned upload endpoint as
//! multipart form data, reporting byte-level progress through a callback,
//! and returns the publicly resolvable URL for backend registration.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::{build_upload_client, check_response, normalize_base_url};

const UPLOAD_CHUNK_BYTES: usize = 256 * 1024;

/// Callback invoked with 0..=100 as upload bytes go out.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// No-op progress callback.
#[must_use]
pub fn no_progress() -> ProgressFn {
    Arc::new(|_| {})
}

/// HTTP client for unsigned CDN video uploads.
#[derive(Clone)]
pub struct CdnUploader {
    upload_url: String,
    upload_preset: String,
    client: Client,
}

impl CdnUploader {
    pub fn new(upload_url: impl AsRef<str>, upload_preset: impl Into<String>) -> Result<Self> {
        let upload_preset = upload_preset.into().trim().to_string();
        if upload_preset.is_empty() {
            return Err(Error::Validation("upload preset must not be empty".into()));
        }
        Ok(Self {
            upload_url: normalize_base_url(upload_url.as_ref())?,
            upload_preset,
            // No overall timeout: large uploads are long-lived.
            client: build_upload_client()?,
        })
    }

    /// Upload a video and return its public URL.
    ///
    /// Rejects non-video media types before any network traffic. Progress
    /// is reported per chunk as the request body streams out, ending with
    /// a final 100 once the CDN has acknowledged the upload.
    pub async fn upload_video(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        on_progress: ProgressFn,
    ) -> Result<String> {
        if !content_type.starts_with("video/") {
            return Err(Error::Validation(format!(
                "expected a video file, got {content_type}"
            )));
        }
        if bytes.is_empty() {
            return Err(Error::Validation("selected file is empty".into()));
        }

        let total = bytes.len();
        tracing::debug!(file_name, total, "starting CDN upload");
        on_progress(0);

        let chunks: Vec<Vec<u8>> = bytes
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(<[u8]>::to_vec)
            .collect();
        let mut sent = 0usize;
        let progress = Arc::clone(&on_progress);
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len();
            progress(percent_of(sent, total));
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(stream), total as u64)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .text("resource_type", "video")
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<CdnUploadResponse>()
            .await?;
        on_progress(100);
        tracing::debug!(url = %payload.secure_url, "CDN upload complete");
        Ok(payload.secure_url)
    }
}

/// Unique object name for an uploaded reel, preserving the extension.
#[must_use]
pub fn object_name(extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        format!("reel-{}", Uuid::new_v4())
    } else {
        format!("reel-{}.{extension}", Uuid::new_v4())
    }
}

fn percent_of(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = sent.saturating_mul(100) / total;
    u8::try_from(pct).unwrap_or(100).min(100)
}

#[derive(Debug, Deserialize)]
struct CdnUploadResponse {
    secure_url: String,
}
