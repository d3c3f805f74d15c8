//! Builders for the canonical post shape.
//!
//! A note lives under its creation time `t`:
//!
//! ```text
//! /t            root (no contents)
//! /t/1          revisions container (no contents)
//! /t/1/<rev>    one node per revision: [text title, text body]
//! /t/2          comments container
//! /t/2/<time>   one node per comment
//! ```
//!
//! Two posts created in the same millisecond share a root key, and the
//! later insert overwrites the earlier one.

use chrono::Utc;
use quill_kernel::{BigIntOrderedMap, BigUint};

use crate::node::{GraphNode, NodeMap};
use crate::path::format_index;
use crate::post::{Content, Post};
use crate::revision::{COMMENTS_SLOT, REVISIONS_SLOT};

/// Source of the current time in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Builds tree fragments for new posts, edits and comments.
///
/// The author is always passed in by the caller.
#[derive(Debug, Clone, Default)]
pub struct PostFactory<C: Clock = SystemClock> {
    clock: C,
}

impl PostFactory<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> PostFactory<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Build a new note. Returns its root key and a one-entry fragment
    /// keyed by the root index.
    pub fn new_post(&self, author: &str, title: &str, body: &str) -> (u64, NodeMap) {
        let now = self.clock.now_ms();
        let root_path = [BigUint::from(now)];
        let revisions_path = [BigUint::from(now), BigUint::from(REVISIONS_SLOT)];
        let comments_path = [BigUint::from(now), BigUint::from(COMMENTS_SLOT)];

        let root = Post::container(author, format_index(&root_path), now);
        let revisions = Post {
            index: format_index(&revisions_path),
            ..root.clone()
        };
        let comments = Post {
            index: format_index(&comments_path),
            ..root.clone()
        };
        let first_revision = Post {
            index: format!("{}/1", revisions.index),
            contents: title_body(title, body),
            ..revisions.clone()
        };

        let mut history = BigIntOrderedMap::new();
        history.put(1u8, GraphNode::leaf(first_revision));

        let mut slots = BigIntOrderedMap::new();
        slots.put(REVISIONS_SLOT, GraphNode::with_children(revisions, history));
        slots.put(COMMENTS_SLOT, GraphNode::leaf(comments));

        let index = root.index.clone();
        let mut nodes = NodeMap::new();
        nodes.insert(index, GraphNode::with_children(root, slots));
        (now, nodes)
    }

    /// Build revision `revision` of note `note_id`.
    ///
    /// `revision` should be one more than the current latest revision;
    /// this is not checked.
    pub fn edit_post(
        &self,
        author: &str,
        revision: impl Into<BigUint>,
        note_id: impl Into<BigUint>,
        title: &str,
        body: &str,
    ) -> NodeMap {
        let now = self.clock.now_ms();
        let index = format_index(&[
            note_id.into(),
            BigUint::from(REVISIONS_SLOT),
            revision.into(),
        ]);
        let post = Post {
            contents: title_body(title, body),
            ..Post::container(author, index.clone(), now)
        };

        let mut nodes = NodeMap::new();
        nodes.insert(index, GraphNode::leaf(post));
        nodes
    }

    /// Build a comment on note `note_id`, keyed by the current time.
    pub fn comment(
        &self,
        author: &str,
        note_id: impl Into<BigUint>,
        contents: Vec<Content>,
    ) -> NodeMap {
        let now = self.clock.now_ms();
        let index = format_index(&[
            note_id.into(),
            BigUint::from(COMMENTS_SLOT),
            BigUint::from(now),
        ]);
        let post = Post {
            contents,
            ..Post::container(author, index.clone(), now)
        };

        let mut nodes = NodeMap::new();
        nodes.insert(index, GraphNode::leaf(post));
        nodes
    }
}

fn title_body(title: &str, body: &str) -> Vec<Content> {
    vec![Content::text(title), Content::text(body)]
}
