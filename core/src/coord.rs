// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board coordinates and their letter/number labels

use crate::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column letters in label order; `I` is never used
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Largest row number accepted when parsing a label
const MAX_LABEL_ROW: u8 = 25;

/// One intersection, 1-based.
///
/// `x` counts columns from the left edge, `y` counts rows from the bottom
/// edge, so `Coordinate::new(4, 4)` is the label `D4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Column, 1 = leftmost
    pub x: u8,
    /// Row, 1 = bottom
    pub y: u8,
}

impl Coordinate {
    /// Create a new coordinate. Range checks are up to the caller.
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Parse a label such as `D4` or `q16`
    pub fn from_label(label: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidFormat(label.to_string());
        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let x = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(invalid)?;

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let y: u8 = digits.parse().map_err(|_| invalid())?;
        if y == 0 || y > MAX_LABEL_ROW {
            return Err(invalid());
        }

        Ok(Self::new(x as u8 + 1, y))
    }

    /// Render as a label, the inverse of [`Coordinate::from_label`]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Letter used for column `x` (1-based)
    pub fn column_letter(x: u8) -> char {
        COLUMN_LETTERS
            .get((x as usize).wrapping_sub(1))
            .map(|&c| c as char)
            .unwrap_or('?')
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letter(self.x), self.y)
    }
}

impl FromStr for Coordinate {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_axis_skips_i() {
        assert_eq!(Coordinate::from_label("H1").unwrap(), Coordinate::new(8, 1));
        assert_eq!(Coordinate::from_label("J1").unwrap(), Coordinate::new(9, 1));
        assert_eq!(Coordinate::from_label("T19").unwrap(), Coordinate::new(19, 19));
        assert_eq!(Coordinate::new(9, 9).label(), "J9");
    }

    #[test]
    fn lowercase_labels_are_accepted() {
        assert_eq!("q16".parse::<Coordinate>().unwrap(), Coordinate::new(16, 16));
    }

    #[test]
    fn malformed_labels() {
        for bad in ["", "I5", "A", "A0", "5A", "Z99", "A-1", "AA1", "A1x"] {
            assert!(
                matches!(Coordinate::from_label(bad), Err(GameError::InvalidFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn label_round_trip() {
        for x in 1..=19 {
            for y in 1..=19 {
                let c = Coordinate::new(x, y);
                assert_eq!(Coordinate::from_label(&c.label()).unwrap(), c);
            }
        }
    }
}
