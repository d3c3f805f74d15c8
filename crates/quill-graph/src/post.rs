//! Post type: the authored payload carried by every graph node.

use quill_kernel::ContentHash;
use serde::{Deserialize, Serialize};

/// Reference to another node, possibly in another graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub graph: String,
    pub index: String,
}

/// One block of post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Mention(String),
    Reference(Reference),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The text of a `Text` block, `None` for every other variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Mention(_) | Self::Reference(_) => None,
        }
    }

    fn canonical(&self) -> String {
        match self {
            Self::Text(text) => format!("text={text}"),
            Self::Mention(who) => format!("mention={who}"),
            Self::Reference(r) => format!("reference={}{}", r.graph, r.index),
        }
    }
}

/// An authored post.
///
/// Contents, signatures and hash do not change after construction; an
/// edit is a new post at a new index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Post {
    pub author: String,
    #[serde(default)]
    pub contents: Vec<Content>,
    #[serde(default)]
    pub hash: Option<ContentHash>,
    pub index: String,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub time_sent: u64,
}

impl Post {
    /// The blank post used wherever structure is missing: empty author,
    /// contents, index and signatures, no hash, time zero.
    pub fn blank() -> Self {
        Self {
            author: String::new(),
            contents: Vec::new(),
            hash: None,
            index: String::new(),
            signatures: Vec::new(),
            time_sent: 0,
        }
    }

    /// A post with no contents, as used for structural containers.
    pub fn container(author: impl Into<String>, index: impl Into<String>, time_sent: u64) -> Self {
        Self {
            author: author.into(),
            index: index.into(),
            time_sent,
            ..Self::blank()
        }
    }

    /// Compute the content hash over author, index, send time and
    /// contents. Signatures are excluded since they sign this value.
    pub fn content_hash(&self) -> ContentHash {
        let mut builder = ContentHash::builder()
            .text("author", &self.author)
            .text("index", &self.index)
            .uint("time-sent", self.time_sent);
        for block in &self.contents {
            builder = builder.text("content", &block.canonical());
        }
        builder.finish()
    }

    /// Text of the content block at `slot`, or `""` when the block is
    /// missing or not text.
    pub fn text_at(&self, slot: usize) -> &str {
        self.contents
            .get(slot)
            .and_then(Content::as_text)
            .unwrap_or_default()
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::blank()
    }
}
