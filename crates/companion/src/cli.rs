//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// Smart Companion CLI
///
/// Ask questions, browse past answers and set event reminders.
#[derive(Parser, Debug)]
#[command(name = "companion")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interaction history (list, watch, delete, clear)
    History(HistoryCommand),

    /// Ask the assistant a question and record the answer
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Upcoming events
    Events(EventsCommand),

    /// Per-event reminders
    Remind(RemindCommand),

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// History Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List recorded interactions, newest first
    List {
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow the history as it changes (Ctrl-C to stop)
    Watch {
        /// How often to check for changes made by other processes, in milliseconds
        #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },

    /// Delete one interaction
    Delete {
        /// Interaction ID
        id: i64,
    },

    /// Delete every interaction
    Clear {
        /// Skip the confirmation notice
        #[arg(short, long)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Events Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

#[derive(Subcommand, Debug)]
pub enum EventsAction {
    /// List upcoming events with their reminder state
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Reminder Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct RemindCommand {
    #[command(subcommand)]
    pub action: RemindAction,
}

#[derive(Subcommand, Debug)]
pub enum RemindAction {
    /// Show whether the reminder for an event is on
    Status {
        /// Event ID
        event_id: String,
    },

    /// Turn the reminder for an event on (or off with --off)
    Set {
        /// Event ID
        event_id: String,

        /// Event title (looked up from the events source when omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Turn the reminder off
        #[arg(long)]
        off: bool,

        /// Exit immediately instead of waiting for the reminder
        #[arg(long)]
        no_wait: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["companion", "ask", "What", "is", "ISEN?"]).unwrap();
        match cli.command {
            Commands::Ask { question } => assert_eq!(question.join(" "), "What is ISEN?"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_watch_interval() {
        let cli = Cli::try_parse_from(["companion", "history", "watch"]).unwrap();
        match cli.command {
            Commands::History(HistoryCommand {
                action: HistoryAction::Watch { interval_ms },
            }) => assert_eq!(interval_ms, 500),
            other => panic!("unexpected command {other:?}"),
        }

        // A zero period would panic in tokio::time::interval
        let zero = Cli::try_parse_from(["companion", "history", "watch", "--interval-ms", "0"]);
        assert!(zero.is_err());
    }

    #[test]
    fn test_parse_remind_set() {
        let cli = Cli::try_parse_from([
            "companion", "remind", "set", "evt-42", "--title", "Open House", "--no-wait",
        ])
        .unwrap();
        match cli.command {
            Commands::Remind(RemindCommand {
                action:
                    RemindAction::Set {
                        event_id,
                        title,
                        off,
                        no_wait,
                    },
            }) => {
                assert_eq!(event_id, "evt-42");
                assert_eq!(title.as_deref(), Some("Open House"));
                assert!(!off);
                assert!(no_wait);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
