//! Interaction History Store
//!
//! Durable, append-only log of question/answer exchanges exposed as a live
//! feed. Every mutation:
//!
//! 1. runs on the blocking pool so async callers never wait on sqlite,
//! 2. takes the single writer lock,
//! 3. applies the change, re-reads the full list (newest first) and publishes
//!    it to all subscribers before the lock is released.
//!
//! Holding the writer lock across all three steps keeps id assignment
//! race-free and guarantees that published snapshots follow mutation order.
//!
//! Writes made by another process sharing the database file are only seen
//! after [`HistoryStore::refresh`], which long-lived watchers call
//! periodically.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use companion_core::{Database, HistoryStore};
//!
//! async fn example() -> companion_core::Result<()> {
//!     let db = Arc::new(Database::open_path("companion.db")?);
//!     let history = HistoryStore::new(db)?;
//!
//!     let mut feed = history.subscribe();
//!     history.append("What is ISEN?", "ISEN is a school").await?;
//!
//!     while let Some(records) = feed.next().await {
//!         println!("{} records", records.len());
//!     }
//!     Ok(())
//! }
//! ```

mod feed;

pub use feed::Feed;

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::db::{Database, InteractionRecord, NewInteraction};
use crate::error::{Error, Result};

/// Shared handle to the interaction history.
///
/// Cloning is cheap; clones share the same writer lock and feed.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    db: Arc<Database>,
    writer: Mutex<()>,
    feed: watch::Sender<Vec<InteractionRecord>>,
    /// `PRAGMA data_version` at the last published snapshot
    seen_version: AtomicI64,
    /// Set when a mutation succeeded but its snapshot could not be read
    stale: AtomicBool,
}

impl HistoryStore {
    /// Create a history store over an open database.
    ///
    /// Loads the current records so the first subscriber sees them immediately.
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let seen_version = db.data_version()?;
        let snapshot = db.list_interactions()?;
        debug!(records = snapshot.len(), "History store loaded");
        let (feed, _) = watch::channel(snapshot);

        Ok(Self {
            inner: Arc::new(Inner {
                db,
                writer: Mutex::new(()),
                feed,
                seen_version: AtomicI64::new(seen_version),
                stale: AtomicBool::new(false),
            }),
        })
    }

    /// Record a new question/answer pair stamped with the current time
    pub async fn append(
        &self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<InteractionRecord> {
        self.insert(NewInteraction::new(question, answer)).await
    }

    /// Record a new interaction
    pub async fn insert(&self, input: NewInteraction) -> Result<InteractionRecord> {
        let record = self
            .mutate(move |db| db.insert_interaction(&input).map(|r| (r, true)))
            .await?;
        info!(id = record.id, "Recorded interaction");
        Ok(record)
    }

    /// Delete a record by identity. Returns false if it was already gone.
    pub async fn delete(&self, record: &InteractionRecord) -> Result<bool> {
        self.delete_by_id(record.id).await
    }

    /// Delete a record by id. Returns false if it was already gone.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let removed = self
            .mutate(move |db| db.delete_interaction(id).map(|removed| (removed, removed)))
            .await?;
        if removed {
            info!(id, "Deleted interaction");
        } else {
            debug!(id, "Interaction already absent");
        }
        Ok(removed)
    }

    /// Remove every record. Returns the number removed.
    pub async fn clear_all(&self) -> Result<usize> {
        let cleared = self
            .mutate(|db| db.clear_interactions().map(|n| (n, n > 0)))
            .await?;
        info!(cleared, "Cleared interaction history");
        Ok(cleared)
    }

    /// Pick up writes made outside this store.
    ///
    /// Republishes when another connection has committed since the last
    /// check, or when an earlier snapshot read failed. Returns true if
    /// subscribers were sent a new snapshot.
    pub async fn refresh(&self) -> Result<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.refresh()).await?
    }

    /// Subscribe to the live feed
    pub fn subscribe(&self) -> Feed {
        Feed::new(self.inner.feed.subscribe())
    }

    /// The latest published snapshot, newest first
    pub fn snapshot(&self) -> Vec<InteractionRecord> {
        self.inner.feed.borrow().clone()
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<(T, bool)> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.apply(op)).await?
    }
}

impl Inner {
    fn apply<T>(&self, op: impl FnOnce(&Database) -> Result<(T, bool)>) -> Result<T> {
        let _guard = self.writer.lock().map_err(|_| Error::LockPoisoned)?;

        let (output, changed) = op(&self.db)?;
        if changed {
            match self.db.list_interactions() {
                Ok(snapshot) => {
                    self.feed.send_replace(snapshot);
                }
                // The mutation is durable; the next refresh republishes.
                Err(e) => {
                    self.stale.store(true, Ordering::SeqCst);
                    warn!(error = %e, "Failed to refresh history feed");
                }
            }
        }

        Ok(output)
    }

    fn refresh(&self) -> Result<bool> {
        let _guard = self.writer.lock().map_err(|_| Error::LockPoisoned)?;

        let version = self.db.data_version()?;
        let stale = self.stale.swap(false, Ordering::SeqCst);
        if !stale && self.seen_version.load(Ordering::SeqCst) == version {
            return Ok(false);
        }

        let snapshot = match self.db.list_interactions() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stale.store(true, Ordering::SeqCst);
                return Err(e);
            }
        };
        self.seen_version.store(version, Ordering::SeqCst);

        let changed = self.feed.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        if changed {
            debug!(version, "Published external history changes");
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio_stream::StreamExt;
    use tokio_test::assert_ok;

    fn setup_store() -> HistoryStore {
        let db = Arc::new(Database::open_in_memory().unwrap());
        HistoryStore::new(db).unwrap()
    }

    fn questions(records: &[InteractionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.question.as_str()).collect()
    }

    #[tokio::test]
    async fn test_isen_scenario() {
        let history = setup_store();

        let first = history.append("What is ISEN?", "ISEN is a school").await.unwrap();
        assert_eq!(first.id, 1);
        let feed = history.snapshot();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].question, "What is ISEN?");
        assert_eq!(feed[0].answer, "ISEN is a school");

        let second = history.append("Where is it?", "Toulon").await.unwrap();
        assert_eq!(history.snapshot(), vec![second.clone(), first.clone()]);

        assert!(history.delete(&first).await.unwrap());
        assert_eq!(history.snapshot(), vec![second]);

        history.clear_all().await.unwrap();
        assert!(history.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_feed_delivers_snapshot_per_mutation() {
        let history = setup_store();
        history.append("existing", "record").await.unwrap();

        let mut feed = history.subscribe();
        assert_eq!(history.inner.feed.receiver_count(), 1);

        // New subscriptions start with the current state
        let initial = feed.next().await.unwrap();
        assert_eq!(questions(&initial), vec!["existing"]);

        let added = history.append("second", "answer").await.unwrap();
        let snapshot = feed.next().await.unwrap();
        assert_eq!(questions(&snapshot), vec!["second", "existing"]);

        history.delete(&added).await.unwrap();
        let snapshot = feed.next().await.unwrap();
        assert_eq!(questions(&snapshot), vec!["existing"]);

        history.clear_all().await.unwrap();
        assert!(feed.next().await.unwrap().is_empty());

        drop(feed);
        assert_eq!(history.inner.feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_feed_as_stream() {
        let history = setup_store();
        let mut stream = history.subscribe().into_stream();

        assert!(stream.next().await.unwrap().is_empty());

        history.append("q", "a").await.unwrap();
        let snapshot = stream.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_is_verbatim() {
        let history = setup_store();
        let question = "  leading and trailing spaces \n";
        let answer = "Multi-line\n\tanswer with unicode: éàü 🚀 ";

        history.append(question, answer).await.unwrap();
        history.append("", "").await.unwrap();

        let records = history.snapshot();
        assert_eq!(records.len(), 2);
        let stored = records.iter().find(|r| !r.question.is_empty()).unwrap();
        assert_eq!(stored.question, question);
        assert_eq!(stored.answer, answer);
    }

    #[tokio::test]
    async fn test_duplicates_are_distinct_records() {
        let history = setup_store();
        let a = history.append("same", "same").await.unwrap();
        let b = history.append("same", "same").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(history.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_double_delete_is_safe() {
        let history = setup_store();
        let keep = history.append("keep", "me").await.unwrap();
        let doomed = history.append("delete", "me").await.unwrap();

        let (first, second) = tokio::join!(history.delete(&doomed), history.delete(&doomed));
        let first = assert_ok!(first);
        let second = assert_ok!(second);
        // Exactly one of the racing deletes removed the record
        assert!(first ^ second);

        assert_eq!(history.snapshot(), vec![keep]);
        assert!(!history.delete_by_id(doomed.id).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_get_distinct_ids() {
        let history = setup_store();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let history = history.clone();
                tokio::spawn(async move {
                    history.append(format!("q{i}"), format!("a{i}")).await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            assert!(ids.insert(record.id), "duplicate id {}", record.id);
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 50);
        assert!(snapshot.windows(2).all(|w| {
            (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id)
        }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_clear_racing_append_is_all_or_nothing() {
        for _ in 0..20 {
            let history = setup_store();
            history.append("old", "record").await.unwrap();

            let h1 = history.clone();
            let h2 = history.clone();
            let (appended, cleared) = tokio::join!(
                tokio::spawn(async move { h1.append("racing", "append").await }),
                tokio::spawn(async move { h2.clear_all().await }),
            );
            let appended = appended.unwrap().unwrap();
            let cleared = cleared.unwrap().unwrap();

            let snapshot = history.snapshot();
            match cleared {
                // Clear ran first: only the append survives
                1 => assert_eq!(snapshot, vec![appended]),
                // Append ran first: both records were cleared
                2 => assert!(snapshot.is_empty()),
                n => panic!("unexpected clear count {n}"),
            }
        }
    }

    #[tokio::test]
    async fn test_explicit_timestamps_order_feed() {
        let history = setup_store();
        history.insert(NewInteraction::new("older", "a").at(1_000)).await.unwrap();
        history.insert(NewInteraction::new("newer", "b").at(5_000)).await.unwrap();
        history.insert(NewInteraction::new("middle", "c").at(3_000)).await.unwrap();

        assert_eq!(questions(&history.snapshot()), vec!["newer", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_other_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companion.db");
        let watcher = HistoryStore::new(Arc::new(Database::open_path(&path).unwrap())).unwrap();
        let writer = HistoryStore::new(Arc::new(Database::open_path(&path).unwrap())).unwrap();

        let mut feed = watcher.subscribe();
        assert!(feed.next().await.unwrap().is_empty());
        assert!(!watcher.refresh().await.unwrap());

        let record = writer.append("q", "a").await.unwrap();
        assert!(watcher.refresh().await.unwrap());

        let snapshot = tokio::time::timeout(Duration::from_secs(2), feed.next())
            .await
            .expect("feed should deliver the other connection's record")
            .unwrap();
        assert_eq!(snapshot, vec![record]);

        // Nothing new since the last check
        assert!(!watcher.refresh().await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_retries_after_failed_snapshot_read() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let history = HistoryStore::new(db.clone()).unwrap();

        // A write the feed has not seen, as left behind by a failed re-read
        db.insert_interaction(&NewInteraction::new("missed", "write")).unwrap();
        assert!(!history.refresh().await.unwrap());
        history.inner.stale.store(true, Ordering::SeqCst);

        assert!(history.refresh().await.unwrap());
        assert_eq!(questions(&history.snapshot()), vec!["missed"]);
        assert!(!history.inner.stale.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_new_store_loads_existing_records() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.insert_interaction(&NewInteraction::new("persisted", "before start")).unwrap();

        let history = HistoryStore::new(db).unwrap();
        let mut feed = history.subscribe();
        assert_eq!(questions(&feed.next().await.unwrap()), vec!["persisted"]);
    }
}
