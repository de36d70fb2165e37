// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nodes of the game tree: moves, setup and annotations

use crate::{Color, Coordinate, Stone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a node.
///
/// The generation changes whenever an arena slot is reused, so a handle to a
/// discarded node never aliases a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// What a move does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Place a stone at the specified coordinate
    Play(Coordinate),
    /// Pass the turn
    Pass,
    /// Resign the game
    Resign,
}

/// A move and the player who made it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeMove {
    pub color: Color,
    pub kind: MoveKind,
}

impl NodeMove {
    pub fn play(color: Color, coord: Coordinate) -> Self {
        Self {
            color,
            kind: MoveKind::Play(coord),
        }
    }

    pub fn pass(color: Color) -> Self {
        Self {
            color,
            kind: MoveKind::Pass,
        }
    }

    pub fn resign(color: Color) -> Self {
        Self {
            color,
            kind: MoveKind::Resign,
        }
    }

    /// Coordinate of a stone placement
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.kind {
            MoveKind::Play(coord) => Some(coord),
            MoveKind::Pass | MoveKind::Resign => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.kind, MoveKind::Pass)
    }
}

impl fmt::Display for NodeMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.color {
            Color::Black => 'B',
            Color::White => 'W',
        };
        match self.kind {
            MoveKind::Play(coord) => write!(f, "{who} {coord}"),
            MoveKind::Pass => write!(f, "{who} pass"),
            MoveKind::Resign => write!(f, "{who} resign"),
        }
    }
}

/// Stones placed or removed without a move (handicap, problem setup)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setup {
    pub black: Vec<Coordinate>,
    pub white: Vec<Coordinate>,
    pub empty: Vec<Coordinate>,
    /// Overrides whose turn it is after this node
    pub player_to_move: Option<Color>,
}

impl Setup {
    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty() && self.empty.is_empty() && self.player_to_move.is_none()
    }

    /// Stone edits in application order: removals, then black, then white
    pub fn changes(&self) -> Vec<(Coordinate, Stone)> {
        self.empty
            .iter()
            .map(|&c| (c, Stone::Empty))
            .chain(self.black.iter().map(|&c| (c, Stone::Black)))
            .chain(self.white.iter().map(|&c| (c, Stone::White)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveValuation {
    Good,
    VeryGood,
    Bad,
    VeryBad,
    Interesting,
    Doubtful,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionValuation {
    Even,
    GoodForBlack,
    VeryGoodForBlack,
    GoodForWhite,
    VeryGoodForWhite,
    Unclear,
}

/// Free-form commentary attached to a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub move_valuation: Option<MoveValuation>,
    pub position_valuation: Option<PositionValuation>,
    pub hotspot: bool,
    /// Score estimate from Black's point of view
    pub estimated_score: Option<f32>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything a node records, independent of its place in the tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeData {
    pub mv: Option<NodeMove>,
    pub setup: Option<Setup>,
    pub annotations: Annotations,
}

impl NodeData {
    pub fn from_move(mv: NodeMove) -> Self {
        Self {
            mv: Some(mv),
            ..Self::default()
        }
    }

    pub fn from_setup(setup: Setup) -> Self {
        Self {
            setup: Some(setup),
            ..Self::default()
        }
    }
}

/// A node linked into a [`Tree`](crate::Tree)
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Child on the current variation
    pub(crate) active_child: Option<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order; the first child is the main continuation
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn mv(&self) -> Option<&NodeMove> {
        self.data.mv.as_ref()
    }

    pub fn setup(&self) -> Option<&Setup> {
        self.data.setup.as_ref()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.data.annotations
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_display() {
        let d4 = Coordinate::new(4, 4);
        assert_eq!(NodeMove::play(Color::Black, d4).to_string(), "B D4");
        assert_eq!(NodeMove::pass(Color::White).to_string(), "W pass");
        assert_eq!(NodeMove::resign(Color::White).coordinate(), None);
    }

    #[test]
    fn setup_changes_remove_before_adding() {
        let setup = Setup {
            black: vec![Coordinate::new(1, 1)],
            white: vec![Coordinate::new(2, 2)],
            empty: vec![Coordinate::new(3, 3)],
            player_to_move: None,
        };
        let changes = setup.changes();
        assert_eq!(changes[0], (Coordinate::new(3, 3), Stone::Empty));
        assert_eq!(changes[2], (Coordinate::new(2, 2), Stone::White));
        assert!(Setup::default().is_empty());
        assert!(Annotations::default().is_empty());
    }
}
