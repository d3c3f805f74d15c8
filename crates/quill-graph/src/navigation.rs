//! Neighbour lookup for stepping between notes.

use quill_kernel::{BigIntOrderedMap, BigUint};

use crate::node::GraphNode;

/// The notes on either side of a note in newest-first order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjacent<'a> {
    /// The next newer note.
    pub newer: Option<(&'a BigUint, &'a GraphNode)>,
    /// The next older note.
    pub older: Option<(&'a BigUint, &'a GraphNode)>,
}

/// Find the neighbours of `note_id` in `graph`.
///
/// Both sides are `None` when `note_id` is not in the graph.
pub fn adjacent_notes<'a>(
    graph: &'a BigIntOrderedMap<GraphNode>,
    note_id: &BigUint,
) -> Adjacent<'a> {
    let mut newer = None;
    let mut entries = graph.entries();
    while let Some(entry) = entries.next() {
        if entry.0 == note_id {
            return Adjacent {
                newer,
                older: entries.next(),
            };
        }
        newer = Some(entry);
    }
    Adjacent::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(keys: &[u64]) -> BigIntOrderedMap<GraphNode> {
        keys.iter().map(|k| (*k, GraphNode::blank())).collect()
    }

    fn key(adjacent: Option<(&BigUint, &GraphNode)>) -> Option<String> {
        adjacent.map(|(k, _)| k.to_string())
    }

    #[test]
    fn middle_note_has_both_neighbours() {
        let notes = graph(&[10, 20, 30]);
        let adjacent = adjacent_notes(&notes, &BigUint::from(20u8));
        assert_eq!(key(adjacent.newer), Some("30".to_string()));
        assert_eq!(key(adjacent.older), Some("10".to_string()));
    }

    #[test]
    fn edges_have_one_neighbour() {
        let notes = graph(&[10, 20, 30]);
        let newest = adjacent_notes(&notes, &BigUint::from(30u8));
        assert_eq!(key(newest.newer), None);
        assert_eq!(key(newest.older), Some("20".to_string()));

        let oldest = adjacent_notes(&notes, &BigUint::from(10u8));
        assert_eq!(key(oldest.newer), Some("20".to_string()));
        assert_eq!(key(oldest.older), None);
    }

    #[test]
    fn unknown_note_has_no_neighbours() {
        let notes = graph(&[10, 20]);
        let adjacent = adjacent_notes(&notes, &BigUint::from(15u8));
        assert!(adjacent.newer.is_none() && adjacent.older.is_none());
    }
}
