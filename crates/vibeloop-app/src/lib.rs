//! vibeloop-app - Application layer for Vibeloop
//!
//! Headless controllers and state machines sitting between
//! `vibeloop-core`'s HTTP clients and whichever shell renders the UI:
//! feed and profile view models with latest-wins fetch reconciliation,
//! optimistic interactions, the modal layer, the upload pipeline,
//! debounced search, and the auth flows.

pub mod auth_flow;
pub mod backend;
pub mod feed;
pub mod interactions;
pub mod logging;
pub mod modal;
pub mod notify;
pub mod remote;
pub mod search;
pub mod state;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use auth_flow::{PhoneStage, PhoneVerification, RegistrationFlow, RegistrationStage, SignInFlow};
pub use backend::{AuthApi, Clipboard, MediaHost, SocialBackend};
pub use feed::{FeedScope, ProfileView, ReelFeed};
pub use interactions::InteractionController;
pub use modal::{ModalState, ReelOverlay, UserListKind};
pub use notify::{Notice, NoticeLevel, NoticeQueue};
pub use remote::{FetchTicket, RemoteCell, RemoteData};
pub use search::{SearchController, SEARCH_DEBOUNCE};
pub use state::AppState;
pub use upload::{SelectedVideo, UploadController, UploadJobView, UploadStatus};
