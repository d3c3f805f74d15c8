//! Live and archived notifications, and the protocol that keeps them
//! in step with the sync layer.
//!
//! Each map sits behind its own `RwLock`. A merge or acknowledgment
//! runs under one write guard, so readers see either the old map or the
//! new one. No guard is held across an `.await`.

use parking_lot::RwLock;
use quill_kernel::BigUint;
use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::notification::Notifications;
use crate::source::{FetchRequest, NotificationSource};

/// Scroll metrics of the inbox viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub client_height: f64,
}

impl ScrollPosition {
    /// Distance left before the bottom of the content.
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

pub struct NotificationIndex<S> {
    source: S,
    config: NotifyConfig,
    live: RwLock<Notifications>,
    archive: RwLock<Notifications>,
}

impl<S: NotificationSource> NotificationIndex<S> {
    pub fn new(source: S, config: NotifyConfig) -> Self {
        Self {
            source,
            config,
            live: RwLock::new(Notifications::new()),
            archive: RwLock::new(Notifications::new()),
        }
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Snapshot of live notifications.
    pub fn live(&self) -> Notifications {
        self.live.read().clone()
    }

    /// Snapshot of archived notifications.
    pub fn archive(&self) -> Notifications {
        self.archive.read().clone()
    }

    /// Snapshot of one side.
    pub fn snapshot(&self, archived: bool) -> Notifications {
        self.side(archived).read().clone()
    }

    /// Unread notifications in live.
    pub fn unread_count(&self) -> usize {
        self.live
            .read()
            .values()
            .flatten()
            .filter(|entry| entry.is_unread())
            .count()
    }

    /// Mark every live notification read, then tell the sync layer.
    ///
    /// Local state is acknowledged even if the sync layer refuses.
    /// Returns how many notifications changed from unread to read.
    pub async fn acknowledge_seen(&self) -> usize {
        let marked = {
            let mut live = self.live.write();
            let mut marked = 0;
            for entry in live.values_mut().flatten() {
                if !entry.notification.read {
                    entry.notification.read = true;
                    marked += 1;
                }
            }
            marked
        };
        debug!(marked, "acknowledged notifications as seen");

        if let Err(err) = self.source.seen().await {
            warn!(error = %err, "failed to report seen to sync layer");
        }
        marked
    }

    /// Request the next page for one side and merge it.
    ///
    /// Returns the number of timeboxes that were new. A failed fetch is
    /// logged and changes nothing. Live pages skip keys the archive
    /// already holds, so a timebox moved by [`archive_timebox`] stays
    /// archived when an overlapping page comes back.
    ///
    /// [`archive_timebox`]: Self::archive_timebox
    pub async fn fetch_more(&self, archived: bool) -> usize {
        let request = FetchRequest {
            archived,
            offset: self.side(archived).read().len(),
            count: self.config.page_size,
        };
        debug!(?request, "fetching notifications");

        match self.source.fetch(request).await {
            Ok(batch) if archived => self.merge(true, batch),
            Ok(batch) => self.merge_fetched_live(batch),
            Err(err) => {
                warn!(error = %err, archived, "notification fetch failed");
                0
            }
        }
    }

    /// Whether the viewport is close enough to the bottom to load more.
    pub fn should_fetch_more(&self, position: ScrollPosition) -> bool {
        position.remaining() < self.config.scroll_threshold
    }

    /// Fetch another page if `position` is near the bottom.
    pub async fn on_scroll(&self, position: ScrollPosition, archived: bool) -> usize {
        if !self.should_fetch_more(position) {
            return 0;
        }
        self.fetch_more(archived).await
    }

    /// Merge a pushed batch into live. Incoming timeboxes replace
    /// existing ones at the same key.
    pub fn merge_live(&self, batch: Notifications) -> usize {
        self.merge(false, batch)
    }

    /// Merge a pushed batch into the archive, then apply retention.
    pub fn merge_archive(&self, batch: Notifications) -> usize {
        self.merge(true, batch)
    }

    /// Move the timebox at `key` from live to archive.
    ///
    /// If the archive already holds that key the notifications are
    /// appended to it. Returns `false` when live has no such timebox.
    pub fn archive_timebox(&self, key: &BigUint) -> bool {
        let mut live = self.live.write();
        let mut archive = self.archive.write();

        let Some(timebox) = live.remove(key) else {
            return false;
        };
        archive
            .get_or_insert_with(key.clone(), Vec::new)
            .extend(timebox);
        self.apply_retention(&mut archive);
        debug!(%key, "archived timebox");
        true
    }

    fn side(&self, archived: bool) -> &RwLock<Notifications> {
        if archived { &self.archive } else { &self.live }
    }

    fn merge(&self, archived: bool, batch: Notifications) -> usize {
        let incoming = batch.len();
        let mut map = self.side(archived).write();
        let added = map.merge(batch);
        if archived {
            self.apply_retention(&mut map);
        }
        debug!(archived, incoming, added, "merged notifications");
        added
    }

    fn merge_fetched_live(&self, batch: Notifications) -> usize {
        let incoming = batch.len();
        let mut live = self.live.write();
        let archive = self.archive.read();
        let fresh: Notifications = batch
            .into_iter()
            .filter(|(key, _)| !archive.contains_key(key))
            .collect();
        let skipped = incoming - fresh.len();
        let added = live.merge(fresh);
        debug!(incoming, skipped, added, "merged fetched live page");
        added
    }

    fn apply_retention(&self, archive: &mut Notifications) {
        if let Some(keep) = self.config.archive_retention {
            let evicted = archive.truncate_oldest(keep);
            if evicted > 0 {
                debug!(evicted, keep, "evicted archived timeboxes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{
        IndexedNotification, NotifIndex, Notification, NotificationContents, Timebox,
    };
    use crate::source::MemorySource;

    fn entry(group: &str, time: u64, read: bool) -> IndexedNotification {
        IndexedNotification {
            index: NotifIndex::Group {
                group: group.to_string(),
                description: "add-members".to_string(),
            },
            notification: Notification {
                read,
                time: BigUint::from(time),
                contents: NotificationContents::Group(Vec::new()),
            },
        }
    }

    fn boxes(keys: &[u64]) -> Notifications {
        keys.iter()
            .map(|k| (*k, vec![entry("/g", *k, false)]))
            .collect()
    }

    fn keys(map: &Notifications) -> Vec<String> {
        map.keys().map(ToString::to_string).collect()
    }

    fn index(live: &[u64], archive: &[u64]) -> NotificationIndex<MemorySource> {
        NotificationIndex::new(
            MemorySource::new(boxes(live), boxes(archive)),
            NotifyConfig::default(),
        )
    }

    #[tokio::test]
    async fn fetch_more_pages_through_source() {
        let index = index(&[50, 40, 30, 20, 10], &[]);
        assert_eq!(index.fetch_more(false).await, 3);
        assert_eq!(keys(&index.live()), vec!["50", "40", "30"]);

        assert_eq!(index.fetch_more(false).await, 2);
        assert_eq!(keys(&index.live()), vec!["50", "40", "30", "20", "10"]);

        let requests = index.source().requests();
        assert_eq!(requests[0].offset, 0);
        assert_eq!(requests[1].offset, 3);
        assert!(requests.iter().all(|r| r.count == 3 && !r.archived));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_unchanged() {
        let index = index(&[50, 40], &[7]);
        index.fetch_more(false).await;
        let before = (index.live(), index.archive());

        index.source().set_failing(true);
        assert_eq!(index.fetch_more(false).await, 0);
        assert_eq!(index.fetch_more(true).await, 0);
        assert_eq!((index.live(), index.archive()), before);
    }

    #[tokio::test]
    async fn acknowledge_marks_live_read_even_if_sync_fails() {
        let index = index(&[3, 2, 1], &[]);
        index.fetch_more(false).await;
        assert_eq!(index.unread_count(), 3);

        index.source().set_failing(true);
        assert_eq!(index.acknowledge_seen().await, 3);
        assert_eq!(index.unread_count(), 0);
        assert_eq!(index.source().seen_calls(), 0);

        index.source().set_failing(false);
        assert_eq!(index.acknowledge_seen().await, 0);
        assert_eq!(index.source().seen_calls(), 1);
    }

    #[test]
    fn merge_overwrites_colliding_timeboxes() {
        let index = index(&[], &[]);
        index.merge_live(boxes(&[5, 4]));

        let replacement: Notifications = [(5u64, vec![entry("/other", 5, true)])]
            .into_iter()
            .collect();
        assert_eq!(index.merge_live(replacement), 0);

        let live = index.live();
        let timebox: &Timebox = live.get(&BigUint::from(5u8)).expect("key 5 present");
        assert_eq!(timebox[0].index.group(), Some("/other"));
        assert_eq!(index.unread_count(), 1);
    }

    #[test]
    fn scroll_threshold_gates_fetching() {
        let index = index(&[], &[]);
        let near = ScrollPosition {
            scroll_height: 1000.0,
            scroll_top: 590.0,
            client_height: 400.0,
        };
        let far = ScrollPosition {
            scroll_top: 100.0,
            ..near
        };
        assert!(index.should_fetch_more(near));
        assert!(!index.should_fetch_more(far));
        assert!(!index.should_fetch_more(ScrollPosition {
            scroll_top: 580.0,
            ..near
        }));
    }

    #[tokio::test]
    async fn on_scroll_only_fetches_near_bottom() {
        let index = index(&[9, 8], &[]);
        let far = ScrollPosition {
            scroll_height: 1000.0,
            scroll_top: 0.0,
            client_height: 400.0,
        };
        assert_eq!(index.on_scroll(far, false).await, 0);
        assert!(index.source().requests().is_empty());

        let bottom = ScrollPosition {
            scroll_top: 600.0,
            ..far
        };
        assert_eq!(index.on_scroll(bottom, false).await, 2);
    }

    #[test]
    fn archive_timebox_moves_between_maps() {
        let index = index(&[], &[]);
        index.merge_live(boxes(&[30, 20]));
        index.merge_archive(boxes(&[20]));

        assert!(index.archive_timebox(&BigUint::from(20u8)));
        assert!(!index.archive_timebox(&BigUint::from(99u8)));

        assert_eq!(keys(&index.live()), vec!["30"]);
        let archive = index.archive();
        assert_eq!(keys(&archive), vec!["20"]);
        assert_eq!(archive.get(&BigUint::from(20u8)).map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn archived_timebox_is_not_refetched_into_live() {
        let index = index(&[50, 40, 30, 20, 10], &[]);
        assert_eq!(index.fetch_more(false).await, 3);
        assert!(index.archive_timebox(&BigUint::from(30u8)));

        assert_eq!(index.fetch_more(false).await, 2);
        let thirty = BigUint::from(30u8);
        assert!(!index.live().contains_key(&thirty));
        assert!(index.archive().contains_key(&thirty));
        assert_eq!(keys(&index.live()), vec!["50", "40", "20", "10"]);
    }

    #[test]
    fn archive_retention_keeps_newest_keys() {
        let index = NotificationIndex::new(
            MemorySource::default(),
            NotifyConfig {
                archive_retention: Some(2),
                ..NotifyConfig::default()
            },
        );
        index.merge_archive(boxes(&[1, 2, 3]));
        assert_eq!(keys(&index.archive()), vec!["3", "2"]);

        index.merge_live(boxes(&[10]));
        index.archive_timebox(&BigUint::from(10u8));
        assert_eq!(keys(&index.archive()), vec!["10", "3"]);
    }
}
