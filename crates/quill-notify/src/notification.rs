//! Notification types as delivered by the sync layer.

use quill_graph::Post;
use quill_kernel::{BigIntOrderedMap, BigUint};
use serde::{Deserialize, Serialize};

/// What a graph notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphDescription {
    Link,
    Comment,
}

impl GraphDescription {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Comment => "comment",
        }
    }
}

/// Where a notification came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifIndex {
    Graph {
        graph: String,
        group: String,
        description: GraphDescription,
        module: String,
    },
    Group {
        group: String,
        description: String,
    },
    /// A chat path; its group is resolved through an association lookup.
    Chat(String),
}

impl NotifIndex {
    /// The group this index names directly. Chats name none.
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Graph { group, .. } | Self::Group { group, .. } => Some(group),
            Self::Chat(_) => None,
        }
    }

    /// Short kind label, used in listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Graph { .. } => "graph",
            Self::Group { .. } => "group",
            Self::Chat(_) => "chat",
        }
    }
}

/// A chat message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    pub uid: String,
    pub number: u64,
    pub author: String,
    pub when: u64,
    pub letter: serde_json::Value,
}

/// Payload of a notification, by source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationContents {
    Graph(Vec<Post>),
    /// Group updates are carried opaquely.
    Group(Vec<serde_json::Value>),
    Chat(Vec<ChatEnvelope>),
}

impl NotificationContents {
    pub fn len(&self) -> usize {
        match self {
            Self::Graph(posts) => posts.len(),
            Self::Group(updates) => updates.len(),
            Self::Chat(envelopes) => envelopes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub read: bool,
    #[serde(with = "quill_kernel::decimal")]
    pub time: BigUint,
    pub contents: NotificationContents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedNotification {
    pub index: NotifIndex,
    pub notification: Notification,
}

impl IndexedNotification {
    pub fn is_unread(&self) -> bool {
        !self.notification.read
    }
}

/// Notifications sharing one coarse time bucket. Unordered; sorted on read.
pub type Timebox = Vec<IndexedNotification>;

/// Timeboxes keyed by bucket time, newest first.
pub type Notifications = BigIntOrderedMap<Timebox>;

/// Both sides of an inbox, as exported by the sync layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InboxSnapshot {
    #[serde(default)]
    pub live: Notifications,
    #[serde(default)]
    pub archive: Notifications,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indices_use_single_key_objects() {
        let chat = NotifIndex::Chat("/~zod/general".to_string());
        assert_eq!(
            serde_json::to_value(&chat).expect("serialize"),
            json!({ "chat": "/~zod/general" })
        );

        let graph: NotifIndex = serde_json::from_value(json!({
            "graph": {
                "graph": "/ship/~zod/notes",
                "group": "/ship/~zod/club",
                "description": "comment",
                "module": "publish"
            }
        }))
        .expect("graph index parses");
        assert_eq!(graph.group(), Some("/ship/~zod/club"));
        assert_eq!(graph.kind(), "graph");
        assert_eq!(chat.group(), None);
    }

    #[test]
    fn notification_time_keeps_full_precision() {
        let raw = json!({
            "read": false,
            "time": "170141184504841449916980385121776435201",
            "contents": { "group": [{ "add-members": {} }] }
        });
        let notification: Notification = serde_json::from_value(raw).expect("parses");
        assert_eq!(
            notification.time.to_string(),
            "170141184504841449916980385121776435201"
        );
        assert_eq!(notification.contents.len(), 1);
    }
}
