//! Notification presentation seam.

use crate::error::Result;

/// Channel importance level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Low,
    Default,
    High,
}

/// A notification channel. Creating one that already exists is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// A user-visible notification.
///
/// Presenting a notification whose `id` is already visible replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: i32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
}

/// Host notification service
pub trait NotificationPresenter: Send + Sync {
    /// Create the channel if absent
    fn ensure_channel(&self, channel: &NotificationChannel) -> Result<()>;

    /// Show (or replace) a notification
    fn present(&self, notification: &Notification) -> Result<()>;
}

/// Run-time notification permission
pub trait PermissionCheck: Send + Sync {
    fn notifications_permitted(&self) -> bool;
}

/// Permission check for hosts without a run-time notification permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPermitted;

impl PermissionCheck for AlwaysPermitted {
    fn notifications_permitted(&self) -> bool {
        true
    }
}
