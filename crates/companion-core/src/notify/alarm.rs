//! One-shot reminder alarms.
//!
//! `TokioAlarmService` keeps one spawned sleeping task per alarm key. Arming
//! a key that is already armed aborts the previous task, so each key has at
//! most one pending alarm. A task that wakes up removes its own slot before
//! handing the alarm to the receiver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A pending reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAlarm {
    /// Slot key derived from the event id
    pub key: i32,
    pub event_id: String,
    pub title: String,
    pub fire_at_epoch_millis: i64,
}

/// Receives alarms when they fire
pub trait AlarmReceiver: Send + Sync {
    fn on_alarm(&self, alarm: &ScheduledAlarm);
}

/// Host timer service
pub trait AlarmService: Send + Sync {
    /// Arm a one-shot alarm, replacing any alarm with the same key
    fn register_one_shot(&self, alarm: ScheduledAlarm, delay: Duration) -> Result<()>;

    /// Cancel a pending alarm. Returns false if none was armed.
    fn cancel(&self, key: i32) -> bool;

    fn is_armed(&self, key: i32) -> bool;
}

/// Handle for a pending alarm task
struct AlarmSlot {
    alarm: ScheduledAlarm,
    generation: u64,
    abort_handle: AbortHandle,
}

type Slots = Arc<Mutex<HashMap<i32, AlarmSlot>>>;

/// In-process alarm service backed by tokio timers.
///
/// Alarms do not survive a process restart.
pub struct TokioAlarmService {
    receiver: Arc<dyn AlarmReceiver>,
    runtime: Handle,
    slots: Slots,
    next_generation: AtomicU64,
}

impl TokioAlarmService {
    /// Create an alarm service on the current tokio runtime
    pub fn new(receiver: Arc<dyn AlarmReceiver>) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::scheduling(format!("no tokio runtime: {}", e)))?;
        Ok(Self::with_handle(receiver, runtime))
    }

    /// Create an alarm service on a specific runtime
    pub fn with_handle(receiver: Arc<dyn AlarmReceiver>, runtime: Handle) -> Self {
        Self {
            receiver,
            runtime,
            slots: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

}

impl AlarmService for TokioAlarmService {
    fn register_one_shot(&self, alarm: ScheduledAlarm, delay: Duration) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| Error::LockPoisoned)?;

        let key = alarm.key;
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let task_slots = Arc::clone(&self.slots);
        let receiver = Arc::clone(&self.receiver);
        let fired = alarm.clone();

        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            // A replaced alarm is aborted, but it may already be past its sleep.
            let still_current = match task_slots.lock() {
                Ok(mut slots) => {
                    if slots.get(&key).is_some_and(|slot| slot.generation == generation) {
                        slots.remove(&key);
                        true
                    } else {
                        false
                    }
                }
                Err(_) => false,
            };

            if still_current {
                debug!(key, event_id = %fired.event_id, "Alarm fired");
                receiver.on_alarm(&fired);
            }
        });

        info!(
            key,
            event_id = %alarm.event_id,
            delay_ms = delay.as_millis() as u64,
            "Armed alarm"
        );

        let replaced = slots.insert(
            key,
            AlarmSlot {
                alarm,
                generation,
                abort_handle: handle.abort_handle(),
            },
        );
        if let Some(previous) = replaced {
            previous.abort_handle.abort();
            debug!(key, "Replaced pending alarm");
        }

        Ok(())
    }

    fn cancel(&self, key: i32) -> bool {
        let Ok(mut slots) = self.slots.lock() else {
            return false;
        };

        match slots.remove(&key) {
            Some(slot) => {
                slot.abort_handle.abort();
                info!(key, event_id = %slot.alarm.event_id, "Cancelled alarm");
                true
            }
            None => false,
        }
    }

    fn is_armed(&self, key: i32) -> bool {
        self.slots
            .lock()
            .map(|slots| slots.contains_key(&key))
            .unwrap_or(false)
    }
}
