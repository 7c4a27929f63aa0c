//! Transient user notifications

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Shared notification queue; clones feed the same queue
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: Arc<Mutex<Vec<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) {
        let notice = Notice {
            level,
            title: title.into(),
            message: message.into(),
        };

        match level {
            NoticeLevel::Error => warn!(title = %notice.title, "{}", notice.message),
            _ => info!(title = %notice.title, "{}", notice.message),
        }

        self.queue.lock().push(notice);
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(NoticeLevel::Info, title, message);
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(NoticeLevel::Success, title, message);
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(NoticeLevel::Error, title, message);
    }

    /// Most recent notice
    pub fn latest(&self) -> Option<Notice> {
        self.queue.lock().last().cloned()
    }

    /// Take every pending notice
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
