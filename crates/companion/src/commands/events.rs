//! Events commands.

use anyhow::{anyhow, Result};
use colored::Colorize;
use companion_core::notify::{PreferenceStore, SqlitePreferenceStore};
use companion_core::{Event, EventSource, HttpEventSource};

use crate::cli::{EventsAction, EventsCommand};
use crate::config::Config;
use crate::database::open_database;

/// Execute events command.
pub async fn execute(cmd: EventsCommand, config: &Config) -> Result<()> {
    match cmd.action {
        EventsAction::List { json } => list(json, config).await,
    }
}

/// Fetch events from the configured source.
pub async fn fetch(config: &Config) -> Result<Vec<Event>> {
    let source = HttpEventSource::new(&config.events)?;
    source
        .fetch_events()
        .await
        .map_err(|e| anyhow!("Failed to load events: {}", e))
}

async fn list(json: bool, config: &Config) -> Result<()> {
    let events = fetch(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events available".dimmed());
        return Ok(());
    }

    let db = open_database(config)?;
    let prefs = SqlitePreferenceStore::new(db, config.notifications.preference_namespace.clone());

    println!("{}", "Upcoming Events".bold());
    for event in &events {
        let reminder = if prefs.get(&event.id)? {
            "🔔".to_string()
        } else {
            " ".to_string()
        };

        println!();
        println!("  {} {} {}", reminder, event.title.bold(), format!("[{}]", event.id).dimmed());
        println!("     📅 {}", event.date);
        println!("     📍 {}", event.location);
        println!("     🏷  {}", event.category.cyan());
        if !event.description.is_empty() {
            println!("     {}", event.description);
        }
    }

    Ok(())
}
