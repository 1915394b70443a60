//! Companion Configuration
//!
//! Defines configuration options for the history store, reminders and the
//! events source.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default events endpoint (Firebase realtime database root)
pub const DEFAULT_EVENTS_URL: &str =
    "https://isen-smart-companion-default-rtdb.europe-west1.firebasedatabase.app/";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Reminder configuration
    pub notifications: NotificationConfig,

    /// Events source configuration
    pub events: EventsConfig,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("companion.db"),
            notifications: NotificationConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

/// Reminder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay between enabling a reminder and the notification, in seconds (default: 10)
    pub delay_secs: u64,

    /// Notification channel identifier (default: "event_channel")
    pub channel_id: String,

    /// Human-readable channel name
    pub channel_name: String,

    /// Channel description
    pub channel_description: String,

    /// Preference namespace holding per-event reminder flags (default: "event_prefs")
    pub preference_namespace: String,

    /// Cancel an armed reminder when it is disabled (default: false)
    pub cancel_on_disable: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            delay_secs: 10,
            channel_id: "event_channel".to_string(),
            channel_name: "Event Notifications".to_string(),
            channel_description: "Event reminders".to_string(),
            preference_namespace: "event_prefs".to_string(),
            cancel_on_disable: false,
        }
    }
}

impl NotificationConfig {
    /// Reminder delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Events source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Base URL; events are fetched from `{base_url}/events.json`
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EVENTS_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CompanionConfig {
    /// Create a new config with the given database path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    /// Set reminder configuration
    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Set events configuration
    pub fn with_events(mut self, events: EventsConfig) -> Self {
        self.events = events;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingDatabasePath);
        }

        if self.notifications.delay_secs == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "notifications.delay_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.notifications.channel_id.trim().is_empty() {
            return Err(ConfigValidationError::InvalidValue {
                field: "notifications.channel_id".into(),
                message: "must not be empty".into(),
            });
        }

        if self.notifications.preference_namespace.trim().is_empty() {
            return Err(ConfigValidationError::InvalidValue {
                field: "notifications.preference_namespace".into(),
                message: "must not be empty".into(),
            });
        }

        let url = &self.events.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigValidationError::InvalidValue {
                field: "events.base_url".into(),
                message: "must be an http(s) URL".into(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("database_path is required")]
    MissingDatabasePath,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompanionConfig::default();
        assert_eq!(config.notifications.delay_secs, 10);
        assert_eq!(config.notifications.delay(), Duration::from_secs(10));
        assert_eq!(config.notifications.channel_id, "event_channel");
        assert_eq!(config.notifications.preference_namespace, "event_prefs");
        assert!(!config.notifications.cancel_on_disable);
        assert_eq!(config.events.base_url, DEFAULT_EVENTS_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CompanionConfig::new("test.db").with_events(EventsConfig {
            base_url: "http://localhost:9000".into(),
            ..EventsConfig::default()
        });

        assert_eq!(config.database_path, PathBuf::from("test.db"));
        assert_eq!(config.events.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_config_validation() {
        let mut config = CompanionConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingDatabasePath)
        ));

        config.database_path = PathBuf::from("companion.db");
        assert!(config.validate().is_ok());

        config.notifications.delay_secs = 0;
        assert!(config.validate().is_err());

        config.notifications.delay_secs = 10;
        config.events.base_url = "ftp://example.com".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("events.base_url"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CompanionConfig = toml::from_str(
            r#"
            database_path = "/tmp/history.db"

            [notifications]
            delay_secs = 30
            cancel_on_disable = true
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/history.db"));
        assert_eq!(config.notifications.delay_secs, 30);
        assert!(config.notifications.cancel_on_disable);
        assert_eq!(config.notifications.channel_id, "event_channel");
        assert_eq!(config.events.timeout_secs, 30);
    }
}
