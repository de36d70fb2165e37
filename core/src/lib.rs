// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goban Core - Go rules engine and game record
//!
//! This crate provides:
//! - Board representation with incrementally maintained regions and liberties
//! - Move legality (suicide, simple ko, positional and situational superko)
//! - A branching game record (node tree) with variation navigation
//! - Mechanical scoring once dead stones are marked

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod config;
pub mod coord;
pub mod game;
pub mod hash;
pub mod node;
pub mod record;
pub mod region;
pub mod rules;
pub mod scoring;
pub mod sequence;
pub mod tree;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use board::{Board, BoardSize, Direction, Intersection};
pub use config::{GameConfig, PlayerKind, Players, DEFAULT_HASH_SEED};
pub use coord::Coordinate;
pub use game::{EndReason, Game, GameStatus, MovePreview};
pub use hash::PositionHasher;
pub use node::{Annotations, MoveKind, MoveValuation, Node, NodeData, NodeId, NodeMove, PositionValuation, Setup};
pub use record::{GameRecord, RecordError};
pub use rules::{
    DisputeResolutionRule, FourPassesRule, KoRule, LifeAndDeathSettlingRule, Rules, ScoringSystem,
};
pub use scoring::{calculate_score, Score, ScoreContext, ScoringMarks, SideScore};
pub use sequence::MoveSequence;
pub use tree::{InsertPolicy, Tree};

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Black player (traditionally goes first)
    Black,
    /// White player
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The stone this color places on the board
    pub fn stone(&self) -> Stone {
        match self {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// State of a single intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// The color owning this stone, `None` for an empty intersection
    pub fn color(&self) -> Option<Color> {
        match self {
            Stone::Empty => None,
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Stone::Empty)
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        color.stone()
    }
}

/// Errors that can occur during game play
///
/// A call that returns one of these never changes board, hash history or
/// tree state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The coordinate is outside the board
    #[error("Coordinate is outside the board")]
    OutOfBounds,

    /// The intersection already holds a stone
    #[error("Intersection already occupied")]
    OccupiedIntersection,

    /// The move would leave its own group without liberties
    #[error("Move would result in self-capture")]
    Suicide,

    /// Immediate recapture that restores the position of two moves ago
    #[error("Move violates the simple ko rule")]
    SimpleKoViolation,

    /// The resulting position already occurred in this variation
    #[error("Move repeats an earlier position (superko)")]
    SuperkoViolation,

    /// A coordinate label could not be parsed
    #[error("Invalid coordinate format: {0}")]
    InvalidFormat(String),

    /// The operation does not fit the current game state
    #[error("Illegal state for operation: {0}")]
    IllegalStateForOperation(&'static str),

    /// The board size is not one of the supported odd sizes 7..=19
    #[error("Unsupported board size {0}")]
    UnsupportedBoardSize(u8),

    /// No traditional handicap layout exists for this stone count
    #[error("Invalid handicap {0} for this board size")]
    InvalidHandicap(u8),

    /// A setup would leave a group without liberties
    #[error("Setup leaves the group at {0} without liberties")]
    InvalidSetup(Coordinate),

    /// The node id does not refer to a live node of the tree
    #[error("Unknown node")]
    UnknownNode,
}
