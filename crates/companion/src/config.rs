//! Configuration management for companion.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (COMPANION_CONFIG, COMPANION_DATABASE_PATH)
//! 2. Config file (platform config dir, `config.toml`)
//! 3. Default values

use anyhow::{Context, Result};
use companion_core::config::{CompanionConfig, EventsConfig, NotificationConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database holding history and reminder preferences
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Reminder settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Events source settings
    #[serde(default)]
    pub events: EventsConfig,

    /// Text generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// External command that answers questions.
///
/// The question is passed as the final argument; stdout is the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Program to run. `ask` fails with an error record when unset.
    pub command: Option<String>,

    /// Arguments placed before the question
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds to wait for an answer
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

// Default value functions
fn default_generator_timeout() -> u64 {
    120
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("fr", "isen", "companion")
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".companion")
    }
}

fn default_database_path() -> PathBuf {
    default_data_dir().join("companion.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            notifications: NotificationConfig::default(),
            events: EventsConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let database_override = std::env::var_os("COMPANION_DATABASE_PATH").map(PathBuf::from);
        Self::load_from(&Self::config_path(), database_override)
    }

    /// Load from a specific file, falling back to defaults when it is missing.
    pub fn load_from(path: &Path, database_override: Option<PathBuf>) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        if let Some(database_path) = database_override {
            config.database_path = database_path;
        }

        config
            .companion()
            .validate()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("COMPANION_CONFIG") {
            PathBuf::from(path)
        } else if let Some(proj_dirs) = project_dirs() {
            proj_dirs.config_dir().join("config.toml")
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Core library configuration
    pub fn companion(&self) -> CompanionConfig {
        CompanionConfig::new(self.database_path.clone())
            .with_notifications(self.notifications.clone())
            .with_events(self.events.clone())
    }
}
