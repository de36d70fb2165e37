// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zobrist-style position hashing for repetition detection
//!
//! One random value per (intersection, color) pair; the hash of a position
//! is the XOR of the values of all occupied intersections. Empty points
//! contribute nothing, so a move only XORs in the placed stone and XORs out
//! the captured ones.

use crate::{Board, BoardSize, Color, Coordinate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-game table of random values
#[derive(Debug, Clone)]
pub struct PositionHasher {
    size: u8,
    /// Two entries per intersection: black, then white
    values: Vec<u64>,
    white_to_move: u64,
}

impl PositionHasher {
    /// Build a table for `size` from `seed`. Equal seeds give equal tables.
    pub fn new(size: BoardSize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..size.area() * 2).map(|_| rng.gen::<u64>()).collect();
        Self {
            size: size.value(),
            values,
            white_to_move: rng.gen(),
        }
    }

    /// Value contributed by a stone of `color` at `coord`
    pub fn stone_value(&self, coord: Coordinate, color: Color) -> u64 {
        let n = self.size as usize;
        let idx = (coord.y as usize - 1) * n + (coord.x as usize - 1);
        let offset = match color {
            Color::Black => 0,
            Color::White => 1,
        };
        self.values[idx * 2 + offset]
    }

    /// Positional hash of the whole board
    pub fn hash_for_board(&self, board: &Board) -> u64 {
        board
            .iter()
            .filter_map(|p| p.stone().color().map(|color| self.stone_value(p.coordinate(), color)))
            .fold(0, |hash, value| hash ^ value)
    }

    /// Fold the side to move into a positional hash (situational superko)
    pub fn with_side_to_move(&self, positional: u64, to_move: Color) -> u64 {
        match to_move {
            Color::Black => positional,
            Color::White => positional ^ self.white_to_move,
        }
    }

    /// Positional hash after `color` plays at `placed` and removes `captured`
    pub fn update(&self, hash: u64, placed: Coordinate, color: Color, captured: &[Coordinate]) -> u64 {
        let opponent = color.opposite();
        captured
            .iter()
            .fold(hash ^ self.stone_value(placed, color), |h, &c| h ^ self.stone_value(c, opponent))
    }
}
