// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serializable game record
//!
//! The arena tree is stored as nested branches: a run of nodes without
//! alternatives followed by the variations that split off its last node.
//! Nesting only grows at branch points, so long games stay shallow for the
//! JSON and CBOR decoders.

use crate::node::{NodeData, NodeId};
use crate::{GameConfig, GameError, Tree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current record format version
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CBOR encoding error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    #[error("Unsupported record version {0}")]
    UnsupportedVersion(u32),
}

/// A run of nodes and the variations after it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordBranch {
    pub nodes: Vec<NodeData>,
    pub variations: Vec<RecordBranch>,
}

/// A complete game: settings plus every variation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub version: u32,
    pub config: GameConfig,
    /// The first node of this branch is the root
    pub tree: RecordBranch,
}

impl GameRecord {
    pub fn from_tree(config: GameConfig, tree: &Tree) -> Self {
        Self {
            version: RECORD_VERSION,
            config,
            tree: branch_from(tree, tree.root()),
        }
    }

    /// Rebuild the node tree. The current node is the root and every
    /// parent's first child is its active child. A root holding a move is
    /// refused rather than losing the move.
    pub fn to_tree(&self) -> Result<Tree, GameError> {
        let mut nodes = self.tree.nodes.iter();
        let root = nodes.next().cloned().unwrap_or_default();
        if root.mv.is_some() {
            return Err(GameError::IllegalStateForOperation("the root node cannot hold a move"));
        }
        let mut tree = Tree::with_root(root);
        let mut parent = tree.root();
        for data in nodes {
            parent = tree.add_child(parent, data.clone())?;
        }
        for variation in &self.tree.variations {
            attach(&mut tree, parent, variation)?;
        }
        Ok(tree)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(json)?;
        record.check_version()
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, RecordError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, RecordError> {
        let record: Self = serde_cbor::from_slice(bytes)?;
        record.check_version()
    }

    fn check_version(self) -> Result<Self, RecordError> {
        if self.version == RECORD_VERSION {
            Ok(self)
        } else {
            Err(RecordError::UnsupportedVersion(self.version))
        }
    }
}

fn branch_from(tree: &Tree, start: NodeId) -> RecordBranch {
    let mut branch = RecordBranch::default();
    let mut cursor = start;
    loop {
        if let Some(node) = tree.node(cursor) {
            branch.nodes.push(node.data().clone());
        }
        match tree.children(cursor) {
            [only] => cursor = *only,
            children => {
                branch.variations = children.iter().map(|&child| branch_from(tree, child)).collect();
                return branch;
            }
        }
    }
}

fn attach(tree: &mut Tree, parent: NodeId, branch: &RecordBranch) -> Result<(), GameError> {
    let mut last = parent;
    for data in &branch.nodes {
        last = tree.add_child(last, data.clone())?;
    }
    for variation in &branch.variations {
        attach(tree, last, variation)?;
    }
    Ok(())
}
