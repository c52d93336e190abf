//! Reel upload pipeline: pick a video, caption it, push it to the CDN
//! with progress, then register the hosted URL with the backend.
//!
//! One job per screen instance. Submit is rejected while an upload is in
//! flight; any failure keeps the selected file and caption so the user
//! can retry without re-picking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vibeloop_core::cdn::ProgressFn;
use vibeloop_core::models::Reel;
use vibeloop_core::session::SessionPersistence;
use vibeloop_core::{Error, Result, SessionStore};

use crate::backend::{MediaHost, SocialBackend};
use crate::notify::NoticeQueue;

/// A video picked from the device, ready for preview and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVideo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Default)]
struct UploadJob {
    video: Option<SelectedVideo>,
    caption: String,
    progress: u8,
    status: UploadStatus,
}

/// What the upload screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJobView {
    pub file_name: Option<String>,
    pub caption: String,
    pub progress: u8,
    pub status: UploadStatus,
}

/// Controller for the upload screen.
pub struct UploadController<B, H, P: SessionPersistence> {
    backend: B,
    host: H,
    session: SessionStore<P>,
    notices: NoticeQueue,
    job: Arc<Mutex<UploadJob>>,
}

impl<B: SocialBackend, H: MediaHost, P: SessionPersistence> UploadController<B, H, P> {
    pub fn new(backend: B, host: H, session: SessionStore<P>, notices: NoticeQueue) -> Self {
        Self {
            backend,
            host,
            session,
            notices,
            job: Arc::new(Mutex::new(UploadJob::default())),
        }
    }

    /// Pick a file. Only videos are accepted; the content type is
    /// guessed from the file name. Rejected while an upload is running.
    pub fn select_video(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let guessed = mime_guess::from_path(file_name).first_or_octet_stream();
        if guessed.type_() != mime_guess::mime::VIDEO {
            return Err(Error::Validation(format!(
                "only video files can be uploaded, got {guessed}"
            )));
        }
        let mut job = self.lock();
        if job.status == UploadStatus::Uploading {
            return Err(Error::Validation("an upload is already running".into()));
        }
        job.video = Some(SelectedVideo {
            file_name: file_name.to_string(),
            content_type: guessed.essence_str().to_string(),
            bytes,
        });
        job.progress = 0;
        job.status = UploadStatus::Pending;
        Ok(())
    }

    pub fn set_caption(&self, caption: &str) {
        self.lock().caption = caption.to_string();
    }

    #[must_use]
    pub fn view(&self) -> UploadJobView {
        let job = self.lock();
        UploadJobView {
            file_name: job.video.as_ref().map(|video| video.file_name.clone()),
            caption: job.caption.clone(),
            progress: job.progress,
            status: job.status.clone(),
        }
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.lock().status == UploadStatus::Uploading
    }

    /// Run the two-stage upload. On success the form resets and exactly
    /// one success notice is queued; on failure the file and caption
    /// survive for a retry.
    pub async fn submit(&self) -> Result<Reel> {
        let token = self.session.require_token()?;

        let (video, caption) = {
            let mut job = self.lock();
            if job.status == UploadStatus::Uploading {
                return Err(Error::Validation("an upload is already running".into()));
            }
            let Some(video) = job.video.clone() else {
                return Err(Error::Validation("select a video first".into()));
            };
            job.status = UploadStatus::Uploading;
            job.progress = 0;
            (video, job.caption.trim().to_string())
        };

        let progress_job = Arc::clone(&self.job);
        let on_progress: ProgressFn = Arc::new(move |percent| {
            progress_job
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .progress = percent;
        });

        let uploaded = self
            .host
            .upload_video(
                &video.file_name,
                &video.content_type,
                video.bytes.clone(),
                on_progress,
            )
            .await;
        let video_url = match uploaded {
            Ok(url) => url,
            Err(error) => return self.fail(error, "Upload failed, tap to retry"),
        };

        match self.backend.register_reel(&token, &video_url, &caption).await {
            Ok(reel) => {
                let mut job = self.lock();
                *job = UploadJob {
                    status: UploadStatus::Succeeded,
                    ..UploadJob::default()
                };
                drop(job);
                self.notices.success("Reel uploaded");
                Ok(reel)
            }
            Err(error) => self.fail(error, "Couldn't publish the reel, tap to retry"),
        }
    }

    fn fail(&self, error: Error, notice: &str) -> Result<Reel> {
        tracing::warn!(%error, "reel upload failed");
        self.lock().status = UploadStatus::Failed(error.to_string());
        self.notices.error(notice);
        Err(error)
    }

    fn lock(&self) -> MutexGuard<'_, UploadJob> {
        self.job.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
