//! History commands: list, watch, delete and clear recorded interactions.

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use companion_core::utils::format_millis;
use companion_core::{HistoryStore, InteractionRecord};
use tracing::warn;

use crate::cli::{HistoryAction, HistoryCommand};
use crate::config::Config;
use crate::database::open_database;

/// Execute history command.
pub async fn execute(cmd: HistoryCommand, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let history = HistoryStore::new(db).context("Failed to load history")?;

    match cmd.action {
        HistoryAction::List { limit, json } => list(&history, limit, json),
        HistoryAction::Watch { interval_ms } => {
            watch(&history, Duration::from_millis(interval_ms)).await
        }
        HistoryAction::Delete { id } => delete(&history, id).await,
        HistoryAction::Clear { yes } => clear(&history, yes).await,
    }
}

fn list(history: &HistoryStore, limit: Option<usize>, json: bool) -> Result<()> {
    let records = history.snapshot();
    let shown: Vec<&InteractionRecord> = records.iter().take(limit.unwrap_or(usize::MAX)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("{}", "No interactions recorded".dimmed());
        return Ok(());
    }

    println!("{} ({} total)", "History".bold(), records.len());
    for record in shown {
        print_record(record);
    }

    Ok(())
}

async fn watch(history: &HistoryStore, poll: Duration) -> Result<()> {
    let mut feed = history.subscribe();
    // Other processes write through their own connection
    let mut ticker = tokio::time::interval(poll);
    println!("{} Watching history (Ctrl-C to stop)", "●".cyan());

    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let Some(records) = snapshot else { break };
                println!(
                    "{} {} record(s)",
                    chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                    records.len()
                );
                if let Some(newest) = records.first() {
                    print_record(newest);
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = history.refresh().await {
                    warn!(error = %e, "Failed to check for history changes");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

async fn delete(history: &HistoryStore, id: i64) -> Result<()> {
    if history
        .delete_by_id(id)
        .await
        .context("Failed to delete interaction")?
    {
        println!("{} Deleted interaction {}", "✓".green(), id);
    } else {
        println!("{} Interaction {} not found", "⚠".yellow(), id);
    }
    Ok(())
}

async fn clear(history: &HistoryStore, yes: bool) -> Result<()> {
    let count = history.snapshot().len();
    if !yes && count > 0 {
        println!(
            "{} This deletes {} interaction(s). Re-run with --yes to confirm.",
            "⚠".yellow(),
            count
        );
        return Ok(());
    }

    let cleared = history
        .clear_all()
        .await
        .context("Failed to clear history")?;
    println!("{} Cleared {} interaction(s)", "✓".green(), cleared);
    Ok(())
}

fn print_record(record: &InteractionRecord) {
    println!();
    println!(
        "  {} {}",
        format!("#{}", record.id).cyan(),
        format_millis(record.created_at).dimmed()
    );
    println!("  {} {}", "Q:".bold(), record.question);
    println!("  {} {}", "A:".bold(), record.answer);
}
