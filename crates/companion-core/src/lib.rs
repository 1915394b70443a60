//! companion-core - Core library for Smart Companion
//!
//! This crate provides everything behind the `companion` CLI:
//!
//! - **db**: Direct SQLite database access
//! - **history**: Interaction history with a live feed
//! - **notify**: Per-event reminders and notifications
//! - **assistant**: Question answering recorded into history
//! - **events**: Upcoming events source
//! - **config**: Configuration and validation

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod history;
pub mod notify;
pub mod utils;

// Re-export commonly used types
pub use assistant::{Assistant, PendingAnswer, TextGenerator};
pub use config::CompanionConfig;
pub use db::{Database, InteractionRecord, NewInteraction};
pub use error::{Error, ErrorKind, Result};
pub use events::{Event, EventSource, HttpEventSource};
pub use history::{Feed, HistoryStore};
pub use notify::{NotificationDispatcher, NotificationScheduler};
