// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear view of the moves along one variation

use crate::node::{NodeId, NodeMove};
use crate::Tree;

/// One numbered move of a variation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEntry {
    pub node: NodeId,
    /// 1-based move number
    pub number: usize,
    pub mv: NodeMove,
}

/// Moves from the root to the leaf of the current variation.
///
/// Derived from the tree on demand; nodes without a move (root, setup)
/// are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSequence {
    entries: Vec<MoveEntry>,
    /// Moves played up to and including the current node
    played: usize,
}

impl MoveSequence {
    pub fn of_current_variation(tree: &Tree) -> Self {
        let played = tree
            .path_to(tree.current())
            .iter()
            .filter(|&&id| tree.node(id).and_then(|n| n.mv()).is_some())
            .count();
        let mut sequence = Self::along(tree, &tree.current_variation());
        sequence.played = played;
        sequence
    }

    /// Moves on the path from the root to `node`
    pub fn up_to(tree: &Tree, node: NodeId) -> Self {
        let sequence = Self::along(tree, &tree.path_to(node));
        Self {
            played: sequence.entries.len(),
            ..sequence
        }
    }

    fn along(tree: &Tree, path: &[NodeId]) -> Self {
        let entries = path
            .iter()
            .filter_map(|&id| tree.node(id).and_then(|n| n.mv().copied()).map(|mv| (id, mv)))
            .enumerate()
            .map(|(i, (node, mv))| MoveEntry {
                node,
                number: i + 1,
                mv,
            })
            .collect();
        Self { entries, played: 0 }
    }

    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move with the given 1-based number
    pub fn get(&self, number: usize) -> Option<&MoveEntry> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn last(&self) -> Option<&MoveEntry> {
        self.entries.last()
    }

    /// Number of moves played up to the current node
    pub fn played(&self) -> usize {
        self.played
    }

    /// Moves after the current node on this variation
    pub fn remaining(&self) -> &[MoveEntry] {
        &self.entries[self.played.min(self.entries.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, Setup};
    use crate::{Color, Coordinate, InsertPolicy};

    #[test]
    fn numbers_skip_setup_nodes() {
        let mut tree = Tree::new();
        tree.append(NodeData::from_setup(Setup::default()), InsertPolicy::LastChild);
        let first = tree.append(
            NodeData::from_move(NodeMove::play(Color::Black, Coordinate::new(3, 3))),
            InsertPolicy::LastChild,
        );
        let second = tree.append(NodeData::from_move(NodeMove::pass(Color::White)), InsertPolicy::LastChild);
        tree.change_variation(first).unwrap();

        let sequence = MoveSequence::of_current_variation(&tree);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.played(), 1);
        assert_eq!(sequence.get(2).unwrap().node, second);
        assert_eq!(sequence.remaining().len(), 1);
        assert!(sequence.get(0).is_none());

        let prefix = MoveSequence::up_to(&tree, first);
        assert_eq!(prefix.len(), 1);
        assert_eq!(prefix.last().unwrap().number, 1);
    }
}
