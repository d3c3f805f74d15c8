//! Dwell timer that acknowledges the inbox once it has stayed visible.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::index::NotificationIndex;
use crate::source::NotificationSource;

/// A running dwell timer for one period of inbox visibility.
///
/// After the dwell elapses the index is acknowledged as seen. Calling
/// [`cancel`](Self::cancel) or dropping the watch before then suppresses
/// it; afterwards the acknowledgment, including the report to the sync
/// layer, always completes.
#[derive(Debug)]
pub struct SeenWatch {
    handle: JoinHandle<()>,
}

impl SeenWatch {
    /// Start a watch using the index's configured dwell.
    pub fn start<S>(index: Arc<NotificationIndex<S>>) -> Self
    where
        S: NotificationSource + 'static,
    {
        let dwell = index.config().seen_dwell();
        Self::with_dwell(index, dwell)
    }

    /// Start a watch with an explicit dwell.
    pub fn with_dwell<S>(index: Arc<NotificationIndex<S>>, dwell: Duration) -> Self
    where
        S: NotificationSource + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            debug!(?dwell, "inbox dwell elapsed");
            // Past the dwell the acknowledgment runs to completion, even
            // if the watch is dropped while the sync layer is answering.
            let acknowledgment = tokio::spawn(async move {
                index.acknowledge_seen().await;
            });
            let _ = acknowledgment.await;
        });
        Self { handle }
    }

    /// Whether the acknowledgment has run (or the task otherwise ended).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer. Has no effect once the dwell has elapsed.
    pub fn cancel(self) {
        // Drop aborts.
    }
}

impl Drop for SeenWatch {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("inbox hidden before dwell elapsed");
        }
        self.handle.abort();
    }
}
