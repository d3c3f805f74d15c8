//! Read-side views over a note: latest revision, comments, snippet.
//!
//! Every function here is total. Missing structure yields a sentinel, so
//! callers have one code path whether or not history exists.

use quill_kernel::BigUint;
use serde::Serialize;

use crate::node::GraphNode;
use crate::post::Post;

/// Child slot holding a note's revision history.
pub const REVISIONS_SLOT: u8 = 1;

/// Child slot holding a note's comments.
pub const COMMENTS_SLOT: u8 = 2;

/// Characters kept by [`snippet`] before truncating.
pub const SNIPPET_LENGTH: usize = 400;

const ELLIPSIS: &str = "...";

/// The newest revision of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestRevision {
    #[serde(with = "quill_kernel::decimal")]
    pub revision: BigUint,
    pub title: String,
    pub body: String,
    pub post: Post,
}

impl LatestRevision {
    /// Revision 1 with empty title and body and a blank post.
    pub fn sentinel() -> Self {
        Self {
            revision: BigUint::from(1u8),
            title: String::new(),
            body: String::new(),
            post: Post::blank(),
        }
    }

    /// The revision number an edit of this note should use.
    pub fn next_revision(&self) -> BigUint {
        &self.revision + 1u8
    }
}

/// Latest revision of `note`: the child of slot 1 with the largest key.
///
/// Title and body are the first two content blocks; missing or
/// non-text blocks read as empty strings.
pub fn latest_revision(note: &GraphNode) -> LatestRevision {
    let Some(revisions) = note.child(&BigUint::from(REVISIONS_SLOT)) else {
        return LatestRevision::sentinel();
    };
    let Some((revision, node)) = revisions.children().next() else {
        return LatestRevision::sentinel();
    };

    LatestRevision {
        revision: revision.clone(),
        title: node.post.text_at(0).to_string(),
        body: node.post.text_at(1).to_string(),
        post: node.post.clone(),
    }
}

/// The comments container of `note`, or a blank terminal node.
pub fn comments(note: &GraphNode) -> GraphNode {
    note.child(&BigUint::from(COMMENTS_SLOT))
        .cloned()
        .unwrap_or_else(GraphNode::blank)
}

/// First [`SNIPPET_LENGTH`] characters of `body`, with `...` appended
/// when anything was cut.
pub fn snippet(body: &str) -> String {
    match body.char_indices().nth(SNIPPET_LENGTH) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &body[..cut]),
        None => body.to_string(),
    }
}
