//! Transient user-visible notifications
//!
//! Every failure in the application is caught where it happens and turned
//! into a [`Notification`] published on a [`Notifier`]. Front ends subscribe
//! and render them as toasts, log lines or whatever suits them.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

/// Broadcast bus for [`Notification`]s.
///
/// Cloning a `Notifier` yields another handle on the same bus. Publishing
/// never fails: with no subscriber the notification is only logged.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => {
                info!(title = %notification.title, "{}", notification.description)
            }
            Severity::Destructive => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
        let _ = self.tx.send(notification);
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(Notification::info(title, description));
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(Notification::error(title, description));
    }
}
