//! Ask command: query the assistant and record the exchange.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use companion_core::{Assistant, HistoryStore};

use crate::config::Config;
use crate::database::open_database;
use crate::generator::ProcessGenerator;

/// Execute ask command.
pub async fn execute(question: &str, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let history = HistoryStore::new(db).context("Failed to load history")?;
    let generator = Arc::new(ProcessGenerator::new(&config.generator));
    let assistant = Assistant::new(generator, history);

    let pending = assistant.submit(question);
    println!("{}", "Thinking...".dimmed());

    let record = pending.wait().await.context("Failed to record answer")?;
    if record.answer.starts_with("Error: ") {
        println!("{} {}", "✗".red(), record.answer);
    } else {
        println!("{}", record.answer);
    }
    println!("{}", format!("(saved as #{})", record.id).dimmed());

    Ok(())
}
