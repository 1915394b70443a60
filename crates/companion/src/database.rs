//! Database connection utility for the CLI.

use std::sync::Arc;

use anyhow::{Context, Result};
use companion_core::Database;

use crate::config::Config;

/// Open the configured database, creating it and its tables on first use.
pub fn open_database(config: &Config) -> Result<Arc<Database>> {
    let db = Database::open_path(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    Ok(Arc::new(db))
}
