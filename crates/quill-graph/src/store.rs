//! Path-addressed node storage.
//!
//! This is the memory boundary for `quill-graph`:
//! - insert nodes at integer paths, creating missing parents
//! - expose side-effect free lookups
//! - no retention policy (nodes are never removed here)

use quill_kernel::{BigIntOrderedMap, BigUint};
use tracing::{debug, trace};

use crate::error::GraphError;
use crate::node::{Children, GraphNode, NodeMap};
use crate::path::{IndexPath, format_index, validate_segments};
use crate::post::Post;

/// A graph of root-keyed nodes, iterated newest key first.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: BigIntOrderedMap<GraphNode>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-materialized top-level graph.
    ///
    /// Every key at every depth must be a positive integer.
    pub fn from_graph(graph: BigIntOrderedMap<GraphNode>) -> Result<Self, GraphError> {
        validate_subgraph(&mut Vec::new(), &graph)?;
        Ok(Self { graph })
    }

    /// Set the node at `path`, returning whatever was there before.
    ///
    /// Missing parents are created with a blank post; parents whose
    /// children are `Empty` are upgraded to a subgraph. Existing parents
    /// keep their post and their other children. The node at `path`
    /// itself is replaced wholesale (last write wins).
    pub fn insert_node(
        &mut self,
        path: &[BigUint],
        node: GraphNode,
    ) -> Result<Option<GraphNode>, GraphError> {
        validate_segments(path)?;
        if let Children::Graph(graph) = &node.children {
            validate_subgraph(&mut path.to_vec(), graph)?;
        }
        let Some((last, parents)) = path.split_last() else {
            return Err(GraphError::invalid_path("", "path has no segments"));
        };

        let mut level = &mut self.graph;
        for (depth, segment) in parents.iter().enumerate() {
            let parent = level.get_or_insert_with(segment.clone(), || {
                let index = format_index(&path[..=depth]);
                debug!(%index, "creating missing parent node");
                GraphNode::leaf(Post {
                    index,
                    ..Post::blank()
                })
            });
            level = parent.children.graph_mut();
        }

        trace!(index = %format_index(path), "insert node");
        Ok(level.put(last.clone(), node))
    }

    /// Look up the node at `path`. Never creates anything.
    pub fn get_node(&self, path: &[BigUint]) -> Option<&GraphNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.graph.get(first)?;
        for segment in rest {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Look up a node by its `/a/b/c` index string.
    pub fn get_index(&self, index: &str) -> Option<&GraphNode> {
        let path = IndexPath::parse(index).ok()?;
        self.get_node(&path)
    }

    /// Children of `node` in descending key order.
    pub fn children(node: &GraphNode) -> impl Iterator<Item = (&BigUint, &GraphNode)> {
        node.children()
    }

    /// Insert every node of a fragment keyed by index string.
    ///
    /// All indices are validated before anything is written, so an
    /// invalid index rejects the whole fragment. Shallower paths are
    /// applied first. Returns the number of nodes written.
    pub fn add_nodes(&mut self, fragment: NodeMap) -> Result<usize, GraphError> {
        let mut parsed = fragment
            .into_iter()
            .map(|(index, node)| Ok((IndexPath::parse(&index)?, node)))
            .collect::<Result<Vec<_>, GraphError>>()?;
        parsed.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        let count = parsed.len();
        for (path, node) in parsed {
            self.insert_node(&path, node)?;
        }
        debug!(count, "applied node fragment");
        Ok(count)
    }

    /// The top-level graph.
    pub fn graph(&self) -> &BigIntOrderedMap<GraphNode> {
        &self.graph
    }

    /// Top-level nodes, newest key first.
    pub fn roots(&self) -> impl Iterator<Item = (&BigUint, &GraphNode)> {
        self.graph.entries()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

fn validate_subgraph(
    prefix: &mut Vec<BigUint>,
    graph: &BigIntOrderedMap<GraphNode>,
) -> Result<(), GraphError> {
    for (key, child) in graph.entries() {
        prefix.push(key.clone());
        validate_segments(prefix)?;
        if let Children::Graph(grandchildren) = &child.children {
            validate_subgraph(prefix, grandchildren)?;
        }
        prefix.pop();
    }
    Ok(())
}
