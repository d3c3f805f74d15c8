//! Seams to the outside world: the sync layer that delivers
//! notifications, and the association table that maps chats to groups.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

use crate::notification::{InboxSnapshot, Notifications};

/// A page request sent to the sync layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Page from the archive rather than live notifications.
    pub archived: bool,
    /// Timeboxes already held for that side.
    pub offset: usize,
    /// Timeboxes wanted.
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync transport failed: {0}")]
    Transport(String),

    #[error("sync rejected request: {0}")]
    Rejected(String),
}

/// The sync layer feeding a [`NotificationIndex`](crate::NotificationIndex).
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Fetch one page of timeboxes.
    async fn fetch(&self, request: FetchRequest) -> Result<Notifications, SyncError>;

    /// Tell the remote side the inbox has been seen.
    async fn seen(&self) -> Result<(), SyncError>;
}

/// In-memory source serving pages out of two fixed maps.
///
/// Used by the CLI to replay an exported inbox, and by tests. Can be
/// switched into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub struct MemorySource {
    live: RwLock<Notifications>,
    archive: RwLock<Notifications>,
    failing: AtomicBool,
    seen_calls: AtomicUsize,
    requests: RwLock<Vec<FetchRequest>>,
}

impl MemorySource {
    pub fn new(live: Notifications, archive: Notifications) -> Self {
        Self {
            live: RwLock::new(live),
            archive: RwLock::new(archive),
            ..Self::default()
        }
    }

    pub fn from_snapshot(snapshot: InboxSnapshot) -> Self {
        Self::new(snapshot.live, snapshot.archive)
    }

    /// Make every later call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `seen` calls.
    pub fn seen_calls(&self) -> usize {
        self.seen_calls.load(Ordering::SeqCst)
    }

    /// Every fetch request received, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.read().clone()
    }

    fn check(&self) -> Result<(), SyncError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::Transport("memory source set to fail".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSource for MemorySource {
    async fn fetch(&self, request: FetchRequest) -> Result<Notifications, SyncError> {
        self.requests.write().push(request);
        self.check()?;

        let side = if request.archived {
            self.archive.read()
        } else {
            self.live.read()
        };
        Ok(side
            .entries()
            .skip(request.offset)
            .take(request.count)
            .map(|(key, timebox)| (key.clone(), timebox.clone()))
            .collect())
    }

    async fn seen(&self) -> Result<(), SyncError> {
        self.check()?;
        for timebox in self.live.write().values_mut() {
            for entry in timebox.iter_mut() {
                entry.notification.read = true;
            }
        }
        self.seen_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Resolves a chat path to the group it belongs to.
pub trait AssociationLookup {
    fn group_for_chat(&self, chat: &str) -> Option<&str>;
}

impl AssociationLookup for BTreeMap<String, String> {
    fn group_for_chat(&self, chat: &str) -> Option<&str> {
        self.get(chat).map(String::as_str)
    }
}

impl AssociationLookup for HashMap<String, String> {
    fn group_for_chat(&self, chat: &str) -> Option<&str> {
        self.get(chat).map(String::as_str)
    }
}

/// No associations: every chat is unresolved.
impl AssociationLookup for () {
    fn group_for_chat(&self, _chat: &str) -> Option<&str> {
        None
    }
}
