//! # quill-graph
//!
//! Content layer for versioned posts.
//!
//! This crate provides:
//! - `Post` and `Content` (the authored payload)
//! - `GraphNode` / `Children` (the tree shape)
//! - `GraphStore` (path-addressed node storage)
//! - `PostFactory` (canonical root/revision/comment fragments)
//! - revision views: latest revision, comments, snippets, neighbours
//!
//! It does not own notifications or any transport. Those concerns live
//! in `quill-notify` and in the embedding application.
//!
//! ## Data model
//!
//! ```text
//! GraphStore
//!   └─ /t                 note root
//!        ├─ /t/1          revisions ─ /t/1/1, /t/1/2, ...
//!        └─ /t/2          comments  ─ /t/2/<time>, ...
//! ```

pub mod error;
pub mod factory;
pub mod navigation;
pub mod node;
pub mod path;
pub mod post;
pub mod revision;
pub mod store;

pub use error::GraphError;
pub use factory::{Clock, FixedClock, PostFactory, SystemClock};
pub use navigation::{Adjacent, adjacent_notes};
pub use node::{Children, GraphNode, NodeMap};
pub use path::{IndexPath, format_index};
pub use post::{Content, Post, Reference};
pub use revision::{
    COMMENTS_SLOT, LatestRevision, REVISIONS_SLOT, SNIPPET_LENGTH, comments, latest_revision,
    snippet,
};
pub use store::GraphStore;
