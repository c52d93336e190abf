//! Per-screen modal state machine.
//!
//! A screen has exactly one tagged modal state instead of a bag of
//! independent booleans, so impossible combinations (two full-screen
//! modals at once) cannot be represented. The reel viewer carries its
//! comment drawer / share menu as a nested overlay rather than a second
//! top-level modal.

use vibeloop_core::ReelId;

/// Which user collection a list modal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListKind {
    Followers,
    Following,
    Posts,
}

/// Overlay nested inside the reel viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReelOverlay {
    #[default]
    None,
    CommentDrawer,
    ShareMenu,
}

/// The single active modal layer for a screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    ReelViewer {
        reel: ReelId,
        overlay: ReelOverlay,
    },
    UserList(UserListKind),
    CommentDrawer(ReelId),
    ShareMenu(ReelId),
}

impl ModalState {
    #[must_use]
    pub fn new() -> Self {
        Self::Closed
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Open the full-screen reel viewer, replacing whatever was active.
    pub fn open_reel_viewer(&mut self, reel: ReelId) {
        *self = Self::ReelViewer {
            reel,
            overlay: ReelOverlay::None,
        };
    }

    /// Open a user-list modal, replacing whatever was active.
    pub fn open_user_list(&mut self, kind: UserListKind) {
        *self = Self::UserList(kind);
    }

    /// Open the comment drawer. Nests inside an open reel viewer;
    /// otherwise becomes the top-level modal.
    pub fn open_comment_drawer(&mut self, reel: ReelId) {
        if let Self::ReelViewer { overlay, .. } = self {
            *overlay = ReelOverlay::CommentDrawer;
        } else {
            *self = Self::CommentDrawer(reel);
        }
    }

    /// Open the share menu. Nests inside an open reel viewer; otherwise
    /// becomes the top-level modal.
    pub fn open_share_menu(&mut self, reel: ReelId) {
        if let Self::ReelViewer { overlay, .. } = self {
            *overlay = ReelOverlay::ShareMenu;
        } else {
            *self = Self::ShareMenu(reel);
        }
    }

    /// Explicit close / backdrop click / Escape. Closes the nested
    /// overlay first; a second dismissal closes the modal itself.
    pub fn dismiss(&mut self) {
        match self {
            Self::ReelViewer { overlay, .. } if *overlay != ReelOverlay::None => {
                *overlay = ReelOverlay::None;
            }
            _ => *self = Self::Closed,
        }
    }

    /// Navigation away from the screen closes everything in one step.
    pub fn close_all(&mut self) {
        *self = Self::Closed;
    }
}
