//! Transient user notifications (the toast layer's data side).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A single transient notification for the shell to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared FIFO of pending notices. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    inner: Arc<Mutex<VecDeque<Notice>>>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Take every pending notice, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notices_drain_in_fifo_order() {
        let queue = NoticeQueue::new();
        queue.success("uploaded");
        queue.error("like failed");

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NoticeLevel::Success);
        assert_eq!(drained[1].message, "like failed");
        assert!(queue.is_empty());
    }

    #[test]
    fn clones_share_the_same_queue() {
        let queue = NoticeQueue::new();
        let clone = queue.clone();
        clone.info("hello");
        assert_eq!(queue.len(), 1);
    }
}
