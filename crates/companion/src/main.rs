//! companion - Smart Companion CLI
//!
//! Assistant history, upcoming events and event reminders from the terminal.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;
mod database;
mod generator;
mod presenter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("companion=info".parse()?)
                .add_directive("companion_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;

    // Execute command
    match cli.command {
        Commands::History(cmd) => commands::history::execute(cmd, &config).await,
        Commands::Ask { question } => commands::ask::execute(&question.join(" "), &config).await,
        Commands::Events(cmd) => commands::events::execute(cmd, &config).await,
        Commands::Remind(cmd) => commands::remind::execute(cmd, &config).await,
        Commands::Version => {
            println!("companion {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
