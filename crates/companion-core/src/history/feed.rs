//! Live history feed.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::db::InteractionRecord;

/// A subscription to the history store.
///
/// The first call to [`Feed::next`] yields the current snapshot immediately;
/// later calls wait for the next mutation and yield the full list again,
/// newest first. Dropping the feed unsubscribes.
pub struct Feed {
    rx: watch::Receiver<Vec<InteractionRecord>>,
    primed: bool,
}

impl Feed {
    pub(crate) fn new(rx: watch::Receiver<Vec<InteractionRecord>>) -> Self {
        Self { rx, primed: false }
    }

    /// Wait for the next snapshot. Returns None once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<InteractionRecord>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Adapt into a `Stream` of snapshots (current one first)
    pub fn into_stream(self) -> WatchStream<Vec<InteractionRecord>> {
        WatchStream::new(self.rx)
    }
}
