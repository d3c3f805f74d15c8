//! # quill-notify
//!
//! Notification index for the Quill inbox.
//!
//! This crate provides:
//! - notification types (`Notification`, `NotifIndex`, `Timebox`)
//! - `NotificationIndex` (live/archive maps kept in step with a sync layer)
//! - `SeenWatch` (dwell timer that acknowledges the inbox)
//! - inbox shaping: group filters and calendar-day sections
//! - `NotifyConfig` (TOML tunables)
//!
//! ## Flow
//!
//! ```text
//! NotificationSource ──fetch──▶ NotificationIndex ──snapshot──▶ build_inbox ──▶ Inbox
//!         ▲                          │
//!         └───────────seen───────────┘ (after SeenWatch dwell)
//! ```

pub mod config;
pub mod inbox;
pub mod index;
pub mod notification;
pub mod seen;
pub mod source;

pub use config::{ConfigError, NotifyConfig};
pub use inbox::{
    DatedTimebox, DaySection, Inbox, admits, build_inbox, filter_by_groups, group_by_day,
    sort_within_day,
};
pub use index::{NotificationIndex, ScrollPosition};
pub use notification::{
    ChatEnvelope, GraphDescription, InboxSnapshot, IndexedNotification, NotifIndex, Notification,
    NotificationContents, Notifications, Timebox,
};
pub use seen::SeenWatch;
pub use source::{AssociationLookup, FetchRequest, MemorySource, NotificationSource, SyncError};
