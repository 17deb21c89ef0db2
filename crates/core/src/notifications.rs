//! Transient, snackbar-style notifications raised by the screens.
//!
//! Screens push notifications; the host drains and displays them.

use crate::constants::NOTIFICATION_AUTO_HIDE_MS;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub message: String,
    /// `None` keeps the notification until dismissed.
    pub auto_hide: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(
            variant = ?notification.variant,
            message = %notification.message,
            "notification raised"
        );
        self.queue.push_back(notification);
    }

    /// Queues a success message that hides itself after one second.
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification {
            variant: NotificationVariant::Success,
            message: message.into(),
            auto_hide: Some(Duration::from_millis(NOTIFICATION_AUTO_HIDE_MS)),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification {
            variant: NotificationVariant::Info,
            message: message.into(),
            auto_hide: Some(Duration::from_millis(NOTIFICATION_AUTO_HIDE_MS)),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification {
            variant: NotificationVariant::Error,
            message: message.into(),
            auto_hide: None,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Notification> + '_ {
        self.queue.drain(..)
    }
}
