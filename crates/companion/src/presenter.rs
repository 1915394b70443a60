//! Terminal notification surface.

use std::collections::HashSet;
use std::sync::Mutex;

use colored::Colorize;
use companion_core::error::{Error, Result};
use companion_core::notify::{Notification, NotificationChannel, NotificationPresenter};
use tokio::sync::Notify;
use tracing::debug;

/// Prints notifications to stdout.
///
/// Waiters on [`TerminalPresenter::presented`] are woken after each one.
#[derive(Default)]
pub struct TerminalPresenter {
    channels: Mutex<HashSet<String>>,
    presented: Notify,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once the next notification has been shown
    pub async fn presented(&self) {
        self.presented.notified().await;
    }
}

impl NotificationPresenter for TerminalPresenter {
    fn ensure_channel(&self, channel: &NotificationChannel) -> Result<()> {
        let mut channels = self.channels.lock().map_err(|_| Error::LockPoisoned)?;
        if channels.insert(channel.id.clone()) {
            debug!(channel = %channel.id, name = %channel.name, "Created notification channel");
        }
        Ok(())
    }

    fn present(&self, notification: &Notification) -> Result<()> {
        println!();
        println!("{} {}", "🔔".yellow(), notification.title.bold());
        println!("  {}", notification.body);
        println!("  {}", format!("#{}", notification.id).dimmed());

        self.presented.notify_one();
        Ok(())
    }
}
