// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-game configuration

use crate::{Board, BoardSize, Color, GameError, InsertPolicy, Rules};
use serde::{Deserialize, Serialize};

/// Seed used for position hashing unless configured otherwise
pub const DEFAULT_HASH_SEED: u64 = 0x1E37_79B9_7F4A_7C15;

/// Who decides a player's moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Human,
    /// Moves come from an external engine
    Computer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Players {
    pub black: PlayerKind,
    pub white: PlayerKind,
}

impl Players {
    pub fn kind(&self, color: Color) -> PlayerKind {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn any_human(&self) -> bool {
        self.black == PlayerKind::Human || self.white == PlayerKind::Human
    }

    /// Both sides are driven by engines
    pub fn computer_vs_computer(&self) -> bool {
        !self.any_human()
    }
}

/// Settings fixed when a game is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub komi: f32,
    /// Number of fixed handicap stones; 0 for an even game
    pub handicap: u8,
    pub insert_policy: InsertPolicy,
    pub hash_seed: u64,
    pub rules: Rules,
    pub players: Players,
}

impl Default for GameConfig {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            board_size: BoardSize::default(),
            komi: rules.standard_komi(),
            handicap: 0,
            rules,
            insert_policy: InsertPolicy::default(),
            players: Players::default(),
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl GameConfig {
    /// Defaults for a given board size
    pub fn with_size(board_size: BoardSize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Check that the handicap fits the board
    pub fn validate(&self) -> Result<(), GameError> {
        Board::new(self.board_size).handicap_points(self.handicap).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GameConfig::default();
        assert_eq!(config.board_size, BoardSize::Nineteen);
        assert_eq!(config.komi, 6.5);
        assert!(config.validate().is_ok());
        assert!(config.players.any_human());
    }

    #[test]
    fn handicap_is_validated_against_board() {
        let mut config = GameConfig::with_size(BoardSize::Nine);
        config.handicap = 9;
        assert_eq!(config.validate(), Err(GameError::InvalidHandicap(9)));
        config.handicap = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"board_size":9,"players":{"white":"computer"}}"#).unwrap();
        assert_eq!(config.board_size, BoardSize::Nine);
        assert_eq!(config.players.kind(Color::White), PlayerKind::Computer);
        assert_eq!(config.players.kind(Color::Black), PlayerKind::Human);

        assert!(serde_json::from_str::<GameConfig>(r#"{"board_size":8}"#).is_err());
    }
}
