// SPDX-License-Identifier: MIT OR Apache-2.0

//! The game record as a tree of nodes
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Discarding
//! a subtree frees its slots and bumps their generation, so stale handles
//! are detected instead of dangling. The tree holds no board state; after
//! moving the current node, callers re-derive the position by replay.

use crate::node::{Annotations, Node, NodeData, NodeId};
use crate::GameError;
use serde::{Deserialize, Serialize};

/// Where a new node goes relative to the existing children of the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPolicy {
    /// After the existing children; they stay as alternatives
    #[default]
    LastChild,
    /// Before the existing children, becoming the main continuation
    FirstChild,
    /// Discard the existing children (overwrite the future)
    DiscardFuture,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    current: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only an empty root node
    pub fn new() -> Self {
        Self::with_root(NodeData::default())
    }

    /// A tree whose root carries `data` (typically handicap setup).
    /// A move on the root is dropped; the root never carries one.
    pub fn with_root(mut data: NodeData) -> Self {
        data.mv = None;
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        let node = Node {
            id: root,
            parent: None,
            children: Vec::new(),
            active_child: None,
            data,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(node),
            }],
            free: Vec::new(),
            root,
            current: root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The selected node; the board shows the position after it
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Child of `id` on the current variation
    pub fn active_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.active_child)
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Edit annotations; they never affect the position
    pub fn annotations_mut(&mut self, id: NodeId) -> Result<&mut Annotations, GameError> {
        Ok(&mut self.node_mut(id)?.data.annotations)
    }

    /// Append under the current node and make the new node current
    pub fn append(&mut self, data: NodeData, policy: InsertPolicy) -> NodeId {
        let parent = self.current;
        if policy == InsertPolicy::DiscardFuture {
            for child in self.children(parent).to_vec() {
                self.free_subtree(child);
            }
            if let Ok(node) = self.node_mut(parent) {
                node.children.clear();
            }
        }

        let id = self.allocate(parent, data);
        if let Ok(node) = self.node_mut(parent) {
            match policy {
                InsertPolicy::FirstChild => node.children.insert(0, id),
                InsertPolicy::LastChild | InsertPolicy::DiscardFuture => node.children.push(id),
            }
            node.active_child = Some(id);
        }
        self.current = id;
        id
    }

    /// Append as the last child of `parent` without moving the current node
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, GameError> {
        if !self.contains(parent) {
            return Err(GameError::UnknownNode);
        }
        let id = self.allocate(parent, data);
        let node = self.node_mut(parent)?;
        node.children.push(id);
        node.active_child.get_or_insert(id);
        Ok(id)
    }

    /// Remove `id` and everything beneath it. Returns the number of nodes
    /// removed. If the current node was inside, its parent becomes current.
    pub fn discard_subtree(&mut self, id: NodeId) -> Result<usize, GameError> {
        let parent = self
            .node(id)
            .ok_or(GameError::UnknownNode)?
            .parent
            .ok_or(GameError::IllegalStateForOperation("cannot discard the root node"))?;

        let current_inside = self.is_ancestor(id, self.current);
        let removed = self.free_subtree(id);

        let node = self.node_mut(parent)?;
        let position = node.children.iter().position(|&c| c == id);
        node.children.retain(|&c| c != id);
        if node.active_child == Some(id) {
            node.active_child = position
                .and_then(|p| p.checked_sub(1))
                .or(position)
                .and_then(|p| node.children.get(p).copied());
        }
        if current_inside {
            self.current = parent;
        }
        Ok(removed)
    }

    /// Make `id` current and route the current variation through it
    pub fn change_variation(&mut self, id: NodeId) -> Result<(), GameError> {
        if !self.contains(id) {
            return Err(GameError::UnknownNode);
        }
        let path = self.path_to(id);
        for pair in path.windows(2) {
            self.node_mut(pair[0])?.active_child = Some(pair[1]);
        }
        self.current = id;
        Ok(())
    }

    /// Nodes from the root down to `id`, both included
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.node(id).map(Node::id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Number of edges between the root and `id`
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to(id).len().saturating_sub(1)
    }

    /// True if `ancestor` is `id` or lies on its path to the root
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id).filter(|&n| self.contains(n));
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// Last node of the current variation, following active children
    pub fn leaf_of_current_variation(&self) -> NodeId {
        let mut leaf = self.current;
        while let Some(next) = self.node(leaf).and_then(|n| n.active_child) {
            leaf = next;
        }
        leaf
    }

    /// Root through the leaf of the current variation
    pub fn current_variation(&self) -> Vec<NodeId> {
        self.path_to(self.leaf_of_current_variation())
    }

    /// All nodes, parents before children, children in order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.node_count());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GameError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(GameError::UnknownNode)
    }

    fn allocate(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                self.slots.len() as u32 - 1
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = NodeId {
            index,
            generation: slot.generation,
        };
        slot.node = Some(Node {
            id,
            parent: Some(parent),
            children: Vec::new(),
            active_child: None,
            data,
        });
        id
    }

    /// Free a node and its descendants; links from the parent stay untouched
    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(next.index as usize)
                .filter(|slot| slot.generation == next.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Coordinate, NodeMove};

    fn play(x: u8, y: u8) -> NodeData {
        NodeData::from_move(NodeMove::play(Color::Black, Coordinate::new(x, y)))
    }

    #[test]
    fn append_follows_insert_policy() {
        let mut tree = Tree::new();
        let a = tree.append(play(1, 1), InsertPolicy::LastChild);
        tree.change_variation(tree.root()).unwrap();
        let b = tree.append(play(2, 2), InsertPolicy::LastChild);
        tree.change_variation(tree.root()).unwrap();
        let c = tree.append(play(3, 3), InsertPolicy::FirstChild);
        assert_eq!(tree.children(tree.root()), &[c, a, b]);

        tree.change_variation(tree.root()).unwrap();
        let d = tree.append(play(4, 4), InsertPolicy::DiscardFuture);
        assert_eq!(tree.children(tree.root()), &[d]);
        assert!(!tree.contains(a) && !tree.contains(b) && !tree.contains(c));
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.current(), d);
    }

    #[test]
    fn discarded_ids_stay_dead_after_slot_reuse() {
        let mut tree = Tree::new();
        let a = tree.append(play(1, 1), InsertPolicy::LastChild);
        let a2 = tree.append(play(1, 2), InsertPolicy::LastChild);
        assert_eq!(tree.discard_subtree(a).unwrap(), 2);
        assert_eq!(tree.current(), tree.root());

        let b = tree.append(play(2, 2), InsertPolicy::LastChild);
        assert!(tree.node(a).is_none());
        assert!(tree.node(a2).is_none());
        assert!(tree.node(b).is_some());
        assert_eq!(tree.change_variation(a), Err(GameError::UnknownNode));
    }

    #[test]
    fn root_cannot_be_discarded() {
        let mut tree = Tree::new();
        assert!(matches!(
            tree.discard_subtree(tree.root()),
            Err(GameError::IllegalStateForOperation(_))
        ));
    }

    #[test]
    fn change_variation_reroutes_leaf() {
        let mut tree = Tree::new();
        let a = tree.append(play(1, 1), InsertPolicy::LastChild);
        let a_leaf = tree.append(play(1, 2), InsertPolicy::LastChild);
        tree.change_variation(tree.root()).unwrap();
        let b = tree.append(play(2, 2), InsertPolicy::LastChild);
        assert_eq!(tree.leaf_of_current_variation(), b);

        tree.change_variation(a).unwrap();
        assert_eq!(tree.current(), a);
        assert_eq!(tree.leaf_of_current_variation(), a_leaf);
        assert_eq!(tree.current_variation(), vec![tree.root(), a, a_leaf]);
        assert_eq!(tree.depth(a_leaf), 2);

        // Discarding the active branch falls back to a sibling
        tree.discard_subtree(a).unwrap();
        tree.change_variation(tree.root()).unwrap();
        assert_eq!(tree.leaf_of_current_variation(), b);
    }

    #[test]
    fn preorder_visits_children_in_order() {
        let mut tree = Tree::new();
        let a = tree.append(play(1, 1), InsertPolicy::LastChild);
        let a1 = tree.append(play(1, 2), InsertPolicy::LastChild);
        let b = tree.add_child(tree.root(), play(2, 2)).unwrap();
        assert_eq!(tree.current(), a1);
        assert_eq!(tree.preorder(), vec![tree.root(), a, a1, b]);
    }

    #[test]
    fn annotations_are_editable_in_place() {
        let mut tree = Tree::new();
        let a = tree.append(play(1, 1), InsertPolicy::LastChild);
        tree.annotations_mut(a).unwrap().comment = Some("joseki".into());
        assert_eq!(tree.node(a).unwrap().annotations().comment.as_deref(), Some("joseki"));
    }
}
