//! Shared in-memory fakes for controller tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use vibeloop_core::auth::{NewAccount, OtpChannel, RegisterOutcome};
use vibeloop_core::cdn::ProgressFn;
use vibeloop_core::models::{Comment, RecentSearch, Reel, ReelId, SearchResult, UserId, UserProfile};
use vibeloop_core::session::MemorySessionStore;
use vibeloop_core::{Error, Result, Session, SessionStore, UserRef};

use crate::backend::{AuthApi, Clipboard, MediaHost, SocialBackend};

pub fn signed_in_store(user_id: &str) -> SessionStore<MemorySessionStore> {
    let store = SessionStore::new(MemorySessionStore::default());
    store
        .sign_in(Session {
            token: "test-token".to_string(),
            user: UserRef {
                id: UserId::from(user_id),
                name: "Tester".to_string(),
                profile_image_url: None,
            },
        })
        .expect("memory store sign-in");
    store
}

pub fn signed_out_store() -> SessionStore<MemorySessionStore> {
    SessionStore::new(MemorySessionStore::default())
}

pub fn sample_reel(id: &str, liked_by: &[&str]) -> Reel {
    let likes: Vec<String> = liked_by.iter().map(ToString::to_string).collect();
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "videoUrl": format!("https://cdn.example.com/{id}.mp4"),
        "caption": "hello #world",
        "postedBy": {"_id": "author", "name": "Author"},
        "likes": likes,
        "comments": [],
        "createdAt": "2025-06-01T12:00:00Z"
    }))
    .expect("sample reel json")
}

pub fn sample_profile(id: &str, followers: &[&str]) -> UserProfile {
    let followers: Vec<String> = followers.iter().map(ToString::to_string).collect();
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "name": "Author",
        "followers": followers,
        "following": [],
    }))
    .expect("sample profile json")
}

pub fn sample_comment(text: &str, by: &str) -> Comment {
    Comment {
        text: text.to_string(),
        commented_by: UserRef {
            id: UserId::from(by),
            name: by.to_string(),
            profile_image_url: None,
        },
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T>>>, operation: &str) -> Result<T> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
        .unwrap_or_else(|| Err(Error::Api(format!("unexpected call: {operation}"))))
}

/// Scripted social backend: each operation pops its next queued outcome
/// and records the call. An unqueued call fails loudly.
#[derive(Default)]
pub struct MockBackend {
    pub reels: Mutex<VecDeque<Result<Vec<Reel>>>>,
    pub profiles: Mutex<VecDeque<Result<UserProfile>>>,
    pub likes: Mutex<VecDeque<Result<Vec<UserId>>>>,
    pub comments: Mutex<VecDeque<Result<Comment>>>,
    pub registered: Mutex<VecDeque<Result<Reel>>>,
    pub searches: Mutex<VecDeque<Result<Vec<SearchResult>>>>,
    pub recents: Mutex<VecDeque<Result<Vec<RecentSearch>>>>,
    pub acks: Mutex<VecDeque<Result<()>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn queue_ok_ack(&self) {
        self.acks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(()));
    }
}

impl SocialBackend for &MockBackend {
    async fn fetch_all_reels(&self) -> Result<Vec<Reel>> {
        self.record("fetch_all_reels");
        pop(&self.reels, "fetch_all_reels")
    }

    async fn fetch_user_reels(&self, user: &UserId) -> Result<Vec<Reel>> {
        self.record(format!("fetch_user_reels {user}"));
        pop(&self.reels, "fetch_user_reels")
    }

    async fn fetch_profile(&self, _token: Option<&str>, user: &UserId) -> Result<UserProfile> {
        self.record(format!("fetch_profile {user}"));
        pop(&self.profiles, "fetch_profile")
    }

    async fn toggle_like(&self, _token: &str, reel: &ReelId) -> Result<Vec<UserId>> {
        self.record(format!("toggle_like {reel}"));
        pop(&self.likes, "toggle_like")
    }

    async fn post_comment(&self, _token: &str, reel: &ReelId, text: &str) -> Result<Comment> {
        self.record(format!("post_comment {reel} {text}"));
        pop(&self.comments, "post_comment")
    }

    async fn follow_user(&self, _token: &str, target: &UserId) -> Result<()> {
        self.record(format!("follow_user {target}"));
        pop(&self.acks, "follow_user")
    }

    async fn unfollow_user(&self, _token: &str, target: &UserId) -> Result<()> {
        self.record(format!("unfollow_user {target}"));
        pop(&self.acks, "unfollow_user")
    }

    async fn register_reel(&self, _token: &str, video_url: &str, _caption: &str) -> Result<Reel> {
        self.record(format!("register_reel {video_url}"));
        pop(&self.registered, "register_reel")
    }

    async fn search_users(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.record(format!("search_users {query}"));
        pop(&self.searches, "search_users")
    }

    async fn fetch_recent_searches(&self, _token: &str) -> Result<Vec<RecentSearch>> {
        self.record("fetch_recent_searches");
        pop(&self.recents, "fetch_recent_searches")
    }

    async fn add_recent_search(&self, _token: &str, user: &UserId) -> Result<()> {
        self.record(format!("add_recent_search {user}"));
        pop(&self.acks, "add_recent_search")
    }

    async fn remove_recent_search(&self, _token: &str, user: &UserId) -> Result<()> {
        self.record(format!("remove_recent_search {user}"));
        pop(&self.acks, "remove_recent_search")
    }

    async fn clear_recent_searches(&self, _token: &str) -> Result<()> {
        self.record("clear_recent_searches");
        pop(&self.acks, "clear_recent_searches")
    }
}

/// Scripted auth backend.
#[derive(Default)]
pub struct MockAuth {
    pub sessions: Mutex<VecDeque<Result<Session>>>,
    pub acks: Mutex<VecDeque<Result<()>>>,
    pub registrations: Mutex<VecDeque<Result<RegisterOutcome>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockAuth {
    fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuthApi for &MockAuth {
    async fn login(&self, email: &str, _password: &str) -> Result<Session> {
        self.record(format!("login {email}"));
        pop(&self.sessions, "login")
    }

    async fn google_login(&self, _id_token: &str) -> Result<Session> {
        self.record("google_login");
        pop(&self.sessions, "google_login")
    }

    async fn send_otp(&self, channel: &OtpChannel) -> Result<()> {
        self.record(format!("send_otp {channel:?}"));
        pop(&self.acks, "send_otp")
    }

    async fn verify_otp(&self, _channel: &OtpChannel, code: &str) -> Result<()> {
        self.record(format!("verify_otp {code}"));
        pop(&self.acks, "verify_otp")
    }

    async fn register(&self, account: &NewAccount) -> Result<RegisterOutcome> {
        self.record(format!("register {}", account.email));
        pop(&self.registrations, "register")
    }
}

/// Scripted media host with a fixed progress trace. `yield_first` lets a
/// test interleave a second operation while the upload is in flight.
#[derive(Default)]
pub struct MockHost {
    pub results: Mutex<VecDeque<Result<String>>>,
    pub progress_trace: Vec<u8>,
    pub yield_first: bool,
}

impl MediaHost for &MockHost {
    async fn upload_video(
        &self,
        _file_name: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
        on_progress: ProgressFn,
    ) -> Result<String> {
        if self.yield_first {
            tokio::task::yield_now().await;
        }
        for percent in &self.progress_trace {
            on_progress(*percent);
        }
        pop(&self.results, "upload_video")
    }
}

/// Clipboard fake that can be told to deny access.
#[derive(Default)]
pub struct MockClipboard {
    pub deny: bool,
    pub contents: Mutex<Option<String>>,
}

impl Clipboard for MockClipboard {
    fn set_text(&self, text: &str) -> std::result::Result<(), String> {
        if self.deny {
            return Err("clipboard permission denied".to_string());
        }
        let mut guard = self.contents.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(text.to_string());
        Ok(())
    }
}
