//! Active toast bookkeeping.
//!
//! [`ToastTray`] is the container toasts are appended to. Expiry timers and
//! rendering are driven by the console; the tray only records which toasts
//! are currently visible, in the order they appeared.

use std::time::Duration;

use chrono::{DateTime, Utc};
use joblog_core::notifications::Notification;
use tokio::sync::RwLock;
use uuid::Uuid;

pub type ToastId = Uuid;

/// A notification that has been placed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub body: String,
    /// How long the toast stays up before it is removed automatically.
    pub timeout: Duration,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    fn from_notification(notification: Notification) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: notification.title,
            body: notification.body,
            timeout: notification.timeout,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastTray {
    toasts: RwLock<Vec<Toast>>,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast for `notification` and return it.
    pub async fn push(&self, notification: Notification) -> Toast {
        let toast = Toast::from_notification(notification);
        self.toasts.write().await.push(toast.clone());
        toast
    }

    /// Remove a toast. Returns `None` if it was already gone, so expiry and
    /// manual dismissal may race without double-removing.
    pub async fn remove(&self, id: ToastId) -> Option<Toast> {
        let mut toasts = self.toasts.write().await;
        let pos = toasts.iter().position(|t| t.id == id)?;
        Some(toasts.remove(pos))
    }

    /// Snapshot of the visible toasts, oldest first.
    pub async fn active(&self) -> Vec<Toast> {
        self.toasts.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.toasts.read().await.len()
    }
}
