//! Reminder commands.
//!
//! Alarms live in this process, so `remind set` stays running until the
//! reminder has been shown unless `--no-wait` is passed. For the same reason
//! `notifications.cancel_on_disable` has no effect here: `remind set --off`
//! runs in a new process and cannot reach an alarm armed by another one.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use companion_core::notify::{
    AlwaysPermitted, NotificationDispatcher, NotificationScheduler, SqlitePreferenceStore,
    TokioAlarmService,
};

use crate::cli::{RemindAction, RemindCommand};
use crate::config::Config;
use crate::database::open_database;
use crate::presenter::TerminalPresenter;

/// Execute remind command.
pub async fn execute(cmd: RemindCommand, config: &Config) -> Result<()> {
    let presenter = Arc::new(TerminalPresenter::new());
    let scheduler = build_scheduler(config, presenter.clone())?;

    match cmd.action {
        RemindAction::Status { event_id } => status(&scheduler, &event_id),
        RemindAction::Set {
            event_id,
            title,
            off,
            no_wait,
        } => {
            let title = resolve_title(&event_id, title, !off, config).await?;
            set(&scheduler, &presenter, &event_id, &title, !off, no_wait).await
        }
    }
}

fn build_scheduler(
    config: &Config,
    presenter: Arc<TerminalPresenter>,
) -> Result<NotificationScheduler> {
    let db = open_database(config)?;
    let notifications = &config.notifications;

    let prefs = Arc::new(SqlitePreferenceStore::new(
        db,
        notifications.preference_namespace.clone(),
    ));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        presenter,
        Arc::new(AlwaysPermitted),
        notifications,
    ));
    let alarms = Arc::new(TokioAlarmService::new(dispatcher)?);

    Ok(NotificationScheduler::new(prefs, alarms, notifications))
}

/// Title for the reminder. Only enabling needs the real one, so turning a
/// reminder off works without reaching the events source.
async fn resolve_title(
    event_id: &str,
    title: Option<String>,
    enabled: bool,
    config: &Config,
) -> Result<String> {
    match title {
        Some(title) => Ok(title),
        None if !enabled => Ok(event_id.to_string()),
        None => lookup_title(event_id, config).await,
    }
}

async fn lookup_title(event_id: &str, config: &Config) -> Result<String> {
    let events = super::events::fetch(config).await?;
    match events.into_iter().find(|e| e.id == event_id) {
        Some(event) => Ok(event.title),
        None => bail!("Event not found: {}", event_id),
    }
}

fn status(scheduler: &NotificationScheduler, event_id: &str) -> Result<()> {
    if scheduler.is_enabled(event_id)? {
        println!("{} Reminder for {} is {}", "🔔".yellow(), event_id.cyan(), "on".green());
    } else {
        println!("  Reminder for {} is {}", event_id.cyan(), "off".dimmed());
    }
    Ok(())
}

async fn set(
    scheduler: &NotificationScheduler,
    presenter: &TerminalPresenter,
    event_id: &str,
    title: &str,
    enabled: bool,
    no_wait: bool,
) -> Result<()> {
    scheduler
        .set_enabled(event_id, enabled, title)
        .context("Failed to update reminder")?;

    if !enabled {
        println!("{} Reminder for {} turned off", "✓".green(), title.cyan());
        return Ok(());
    }

    println!(
        "{} Reminder for {} set, notifying in {}s",
        "✓".green(),
        title.cyan(),
        scheduler.delay().as_secs()
    );

    if no_wait {
        println!(
            "{} Exiting now drops the pending reminder",
            "⚠".yellow()
        );
        return Ok(());
    }

    tokio::select! {
        _ = presenter.presented() => {}
        _ = tokio::signal::ctrl_c() => {
            println!("{} Interrupted before the reminder fired", "⚠".yellow());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> Config {
        let mut config = Config::default();
        // Nothing listens on the discard port
        config.events.base_url = "http://127.0.0.1:9".to_string();
        config.events.timeout_secs = 2;
        config
    }

    #[tokio::test]
    async fn test_disabling_needs_no_events_source() {
        let title = resolve_title("evt-42", None, false, &offline_config())
            .await
            .unwrap();
        assert_eq!(title, "evt-42");
    }

    #[tokio::test]
    async fn test_explicit_title_skips_lookup() {
        let title = resolve_title("evt-42", Some("Open House".into()), true, &offline_config())
            .await
            .unwrap();
        assert_eq!(title, "Open House");
    }

    #[tokio::test]
    async fn test_enabling_without_title_needs_events_source() {
        let err = resolve_title("evt-42", None, true, &offline_config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load events"));
    }
}
