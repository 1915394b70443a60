//! Turns fired alarms into user-visible notifications.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::alarm::{AlarmReceiver, ScheduledAlarm};
use super::presenter::{
    Importance, Notification, NotificationChannel, NotificationPresenter, PermissionCheck,
};
use crate::config::NotificationConfig;
use crate::error::Result;
use crate::utils::stable_key;

/// Title shown on every reminder
pub const NOTIFICATION_TITLE: &str = "Upcoming Event!";

/// Result of handling a fired alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Presented { notification_id: i32 },
    /// Notification permission is missing; nothing was shown.
    PermissionDenied,
}

/// Build the reminder notification for an event title.
///
/// The id is derived from the title, so repeated reminders for the same
/// title replace each other instead of stacking. The title is used as given,
/// including when it is empty.
pub fn reminder_notification(channel_id: &str, event_title: &str) -> Notification {
    Notification {
        id: stable_key(event_title),
        channel_id: channel_id.to_string(),
        title: NOTIFICATION_TITLE.to_string(),
        body: format!("Reminder: {} is happening soon.", event_title),
    }
}

/// Receives fired alarms and presents reminder notifications
pub struct NotificationDispatcher {
    presenter: Arc<dyn NotificationPresenter>,
    permission: Arc<dyn PermissionCheck>,
    channel: NotificationChannel,
}

impl NotificationDispatcher {
    pub fn new(
        presenter: Arc<dyn NotificationPresenter>,
        permission: Arc<dyn PermissionCheck>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            presenter,
            permission,
            channel: NotificationChannel {
                id: config.channel_id.clone(),
                name: config.channel_name.clone(),
                description: config.channel_description.clone(),
                importance: Importance::High,
            },
        }
    }

    /// Handle a fired reminder for `title`.
    ///
    /// Permission denial is a silent skip, not an error.
    pub fn on_timer_fired(&self, title: &str) -> Result<FireOutcome> {
        self.presenter.ensure_channel(&self.channel)?;

        if !self.permission.notifications_permitted() {
            debug!(title, "Notification permission missing, skipping reminder");
            return Ok(FireOutcome::PermissionDenied);
        }

        let notification = reminder_notification(&self.channel.id, title);
        self.presenter.present(&notification)?;
        info!(notification_id = notification.id, title, "Presented reminder");

        Ok(FireOutcome::Presented {
            notification_id: notification.id,
        })
    }
}

impl AlarmReceiver for NotificationDispatcher {
    fn on_alarm(&self, alarm: &ScheduledAlarm) {
        if let Err(e) = self.on_timer_fired(&alarm.title) {
            error!(error = %e, event_id = %alarm.event_id, "Failed to present reminder");
        }
    }
}
