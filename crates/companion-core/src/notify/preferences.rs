//! Per-event reminder preferences.

use std::sync::Arc;

use crate::db::Database;
use crate::error::Result;

/// Durable boolean key-value namespace.
///
/// Unknown keys read as `false`.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<bool>;

    fn put(&self, key: &str, enabled: bool) -> Result<()>;
}

/// Preference namespace stored in the shared companion database.
pub struct SqlitePreferenceStore {
    db: Arc<Database>,
    namespace: String,
}

impl SqlitePreferenceStore {
    pub fn new(db: Arc<Database>, namespace: impl Into<String>) -> Self {
        Self {
            db,
            namespace: namespace.into(),
        }
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: &str) -> Result<bool> {
        Ok(self.db.get_preference(&self.namespace, key)?.unwrap_or(false))
    }

    fn put(&self, key: &str, enabled: bool) -> Result<()> {
        self.db.set_preference(&self.namespace, key, enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_false() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let prefs = SqlitePreferenceStore::new(db, "event_prefs");

        assert!(!prefs.get("never-set").unwrap());
    }

    #[test]
    fn test_last_write_wins() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let prefs = SqlitePreferenceStore::new(db.clone(), "event_prefs");
        let other = SqlitePreferenceStore::new(db, "other_prefs");

        prefs.put("evt-1", true).unwrap();
        prefs.put("evt-2", true).unwrap();
        prefs.put("evt-1", false).unwrap();

        assert!(!prefs.get("evt-1").unwrap());
        assert!(prefs.get("evt-2").unwrap());
        assert!(!other.get("evt-2").unwrap());
    }
}
