//! Per-event reminder toggles backed by one-shot alarms.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::alarm::{AlarmService, ScheduledAlarm};
use super::preferences::PreferenceStore;
use crate::config::NotificationConfig;
use crate::error::Result;
use crate::utils::{now_millis, stable_key};

/// Persists reminder preferences and arms the matching alarms.
///
/// Enabling a reminder arms a one-shot alarm `delay` from now, keyed by the
/// event id. Enabling again replaces the pending alarm. Disabling only
/// records the preference unless `cancel_on_disable` is set, in which case
/// the pending alarm is cancelled too.
pub struct NotificationScheduler {
    prefs: Arc<dyn PreferenceStore>,
    alarms: Arc<dyn AlarmService>,
    delay: Duration,
    cancel_on_disable: bool,
}

impl NotificationScheduler {
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        alarms: Arc<dyn AlarmService>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            prefs,
            alarms,
            delay: config.delay(),
            cancel_on_disable: config.cancel_on_disable,
        }
    }

    /// Whether the reminder for `event_id` is on. Defaults to false.
    pub fn is_enabled(&self, event_id: &str) -> Result<bool> {
        self.prefs.get(event_id)
    }

    /// Turn the reminder for `event_id` on or off.
    ///
    /// The preference is written before the alarm is touched, so a
    /// scheduling failure still leaves the preference recorded.
    pub fn set_enabled(&self, event_id: &str, enabled: bool, title: &str) -> Result<()> {
        self.prefs.put(event_id, enabled)?;
        let key = stable_key(event_id);

        if enabled {
            let alarm = ScheduledAlarm {
                key,
                event_id: event_id.to_string(),
                title: title.to_string(),
                fire_at_epoch_millis: now_millis() + self.delay.as_millis() as i64,
            };
            self.alarms.register_one_shot(alarm, self.delay)?;
            info!(event_id, title, "Reminder enabled");
        } else if self.cancel_on_disable {
            let cancelled = self.alarms.cancel(key);
            info!(event_id, cancelled, "Reminder disabled");
        } else {
            debug!(event_id, "Reminder disabled, pending alarm left armed");
        }

        Ok(())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
