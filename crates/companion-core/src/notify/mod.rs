//! Event Reminders
//!
//! A reminder is a per-event boolean preference plus a one-shot alarm. When
//! the alarm fires, the [`NotificationDispatcher`] shows a notification on
//! the reminder channel, provided notification permission is granted.
//!
//! Host services sit behind traits:
//!
//! - [`PreferenceStore`]: durable per-event flags
//! - [`AlarmService`]: one-shot timers
//! - [`NotificationPresenter`] and [`PermissionCheck`]: the notification surface

mod alarm;
mod dispatcher;
mod preferences;
mod presenter;
mod scheduler;

pub use alarm::{AlarmReceiver, AlarmService, ScheduledAlarm, TokioAlarmService};
pub use dispatcher::{
    reminder_notification, FireOutcome, NotificationDispatcher, NOTIFICATION_TITLE,
};
pub use preferences::{PreferenceStore, SqlitePreferenceStore};
pub use presenter::{
    AlwaysPermitted, Importance, Notification, NotificationChannel, NotificationPresenter,
    PermissionCheck,
};
pub use scheduler::NotificationScheduler;
