//! Graph nodes and their children.

use quill_kernel::{BigIntOrderedMap, BigUint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::post::Post;

/// A tree fragment keyed by index string (`/a/b/c`), as exchanged with
/// the sync layer.
pub type NodeMap = BTreeMap<String, GraphNode>;

/// Children of a node: terminal, or a keyed subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Children {
    #[default]
    Empty,
    Graph(BigIntOrderedMap<GraphNode>),
}

impl Children {
    pub fn get(&self, key: &BigUint) -> Option<&GraphNode> {
        match self {
            Self::Empty => None,
            Self::Graph(graph) => graph.get(key),
        }
    }

    /// Children in descending key order; nothing for `Empty`.
    pub fn iter(&self) -> impl Iterator<Item = (&BigUint, &GraphNode)> {
        let graph = match self {
            Self::Empty => None,
            Self::Graph(graph) => Some(graph.entries()),
        };
        graph.into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Graph(graph) => graph.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The subgraph, upgrading `Empty` to an empty `Graph` first.
    pub(crate) fn graph_mut(&mut self) -> &mut BigIntOrderedMap<GraphNode> {
        match self {
            Self::Graph(graph) => graph,
            Self::Empty => {
                *self = Self::Graph(BigIntOrderedMap::new());
                self.graph_mut()
            }
        }
    }
}

/// An addressable unit of content: one post and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub post: Post,
    #[serde(default)]
    pub children: Children,
}

impl GraphNode {
    /// A terminal node.
    pub fn leaf(post: Post) -> Self {
        Self {
            post,
            children: Children::Empty,
        }
    }

    /// A node with the given subgraph.
    pub fn with_children(post: Post, children: BigIntOrderedMap<GraphNode>) -> Self {
        Self {
            post,
            children: Children::Graph(children),
        }
    }

    /// The blank node returned where expected structure is missing.
    pub fn blank() -> Self {
        Self::leaf(Post::blank())
    }

    pub fn child(&self, key: &BigUint) -> Option<&GraphNode> {
        self.children.get(key)
    }

    /// Children in descending key order.
    pub fn children(&self) -> impl Iterator<Item = (&BigUint, &GraphNode)> {
        self.children.iter()
    }

    /// Fill in the content hash of this post and of every descendant.
    pub fn compute_hashes(&mut self) {
        self.post.hash = Some(self.post.content_hash());
        if let Children::Graph(graph) = &mut self.children {
            for child in graph.values_mut() {
                child.compute_hashes();
            }
        }
    }
}
