// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mechanical scoring once dead stones are known
//!
//! Deciding which stones are dead is up to the players or an external
//! engine. Given those marks, this module assigns territory and counts.

use crate::{Board, Color, Coordinate, ScoringSystem, Stone};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Dead-stone flags and territory colors per intersection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringMarks {
    pub dead: HashSet<Coordinate>,
    pub territory: HashMap<Coordinate, Color>,
}

impl ScoringMarks {
    /// Mark `dead` stones and derive territory: every area of empty or dead
    /// points bordered by living stones of one color only belongs to that
    /// color. Marks on empty points are ignored.
    pub fn from_dead_stones(board: &Board, dead: impl IntoIterator<Item = Coordinate>) -> Self {
        let dead: HashSet<Coordinate> = dead
            .into_iter()
            .filter(|&c| matches!(board.stone_at(c), Ok(s) if !s.is_empty()))
            .collect();
        let open = |c: Coordinate| matches!(board.stone_at(c), Ok(Stone::Empty)) || dead.contains(&c);

        let mut territory = HashMap::new();
        let mut seen = HashSet::new();
        for point in board.iter() {
            let start = point.coordinate();
            if !open(start) || seen.contains(&start) {
                continue;
            }
            let (area, borders) = area_and_borders(board, start, &open, &mut seen);
            if borders.len() == 1 {
                if let Some(&owner) = borders.iter().next() {
                    territory.extend(area.into_iter().map(|c| (c, owner)));
                }
            }
        }

        Self { dead, territory }
    }

    pub fn is_dead(&self, coord: Coordinate) -> bool {
        self.dead.contains(&coord)
    }
}

/// BFS over open points; returns (area, colors of living stones bordering it)
fn area_and_borders(
    board: &Board,
    start: Coordinate,
    open: &impl Fn(Coordinate) -> bool,
    seen: &mut HashSet<Coordinate>,
) -> (Vec<Coordinate>, HashSet<Color>) {
    let mut queue = VecDeque::from([start]);
    let mut area = vec![start];
    let mut borders = HashSet::new();
    seen.insert(start);

    while let Some(c) = queue.pop_front() {
        for n in board.neighbors(c) {
            if open(n) {
                if seen.insert(n) {
                    area.push(n);
                    queue.push_back(n);
                }
            } else if let Ok(Some(color)) = board.stone_at(n).map(|s| s.color()) {
                borders.insert(color);
            }
        }
    }
    (area, borders)
}

/// One side's share of the score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideScore {
    /// Empty or dead-stone points owned
    pub territory: u32,
    /// Living stones on the board (area scoring)
    pub stones: u32,
    /// Opponent stones captured during play
    pub prisoners: u32,
    /// Opponent stones marked dead (territory scoring)
    pub dead_stones: u32,
    pub komi: f32,
    /// Extra points for White in handicap games under area scoring
    pub handicap_compensation: f32,
    pub total: f32,
}

/// Final count of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub system: ScoringSystem,
    pub black: SideScore,
    pub white: SideScore,
}

impl Score {
    /// Black's total minus White's total
    pub fn margin(&self) -> f32 {
        self.black.total - self.white.total
    }

    /// The winner, `None` for a tie (jigo)
    pub fn winner(&self) -> Option<Color> {
        let margin = self.margin();
        if margin > 0.0 {
            Some(Color::Black)
        } else if margin < 0.0 {
            Some(Color::White)
        } else {
            None
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner() {
            Some(Color::Black) => write!(f, "B+{}", self.margin()),
            Some(Color::White) => write!(f, "W+{}", -self.margin()),
            None => write!(f, "Jigo"),
        }
    }
}

/// Inputs besides the board that the count depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub system: ScoringSystem,
    pub komi: f32,
    pub handicap: u8,
    /// Stones captured by Black and by White during play
    pub prisoners: (u32, u32),
}

/// Count the score of `board` under `marks`
pub fn calculate_score(board: &Board, marks: &ScoringMarks, context: ScoreContext) -> Score {
    let mut black = SideScore {
        prisoners: context.prisoners.0,
        ..SideScore::default()
    };
    let mut white = SideScore {
        prisoners: context.prisoners.1,
        komi: context.komi,
        ..SideScore::default()
    };

    for point in board.iter() {
        let coord = point.coordinate();
        let dead = marks.is_dead(coord);
        match (point.stone().color(), dead) {
            (Some(Color::Black), false) => black.stones += 1,
            (Some(Color::White), false) => white.stones += 1,
            (Some(Color::Black), true) => white.dead_stones += 1,
            (Some(Color::White), true) => black.dead_stones += 1,
            (None, _) => {}
        }
        if point.is_empty() || dead {
            match marks.territory.get(&coord) {
                Some(Color::Black) => black.territory += 1,
                Some(Color::White) => white.territory += 1,
                None => {}
            }
        }
    }

    match context.system {
        ScoringSystem::TerritoryScoring => {
            black.total = (black.territory + black.prisoners + black.dead_stones) as f32;
            white.total = (white.territory + white.prisoners + white.dead_stones) as f32 + white.komi;
        }
        ScoringSystem::AreaScoring => {
            if context.handicap >= 2 {
                white.handicap_compensation = context.handicap as f32;
            }
            black.total = (black.territory + black.stones) as f32;
            white.total = (white.territory + white.stones) as f32 + white.komi + white.handicap_compensation;
        }
    }

    Score {
        system: context.system,
        black,
        white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardSize;

    fn c(label: &str) -> Coordinate {
        Coordinate::from_label(label).unwrap()
    }

    fn context(system: ScoringSystem) -> ScoreContext {
        ScoreContext {
            system,
            komi: 6.5,
            handicap: 0,
            prisoners: (0, 0),
        }
    }

    /// Black wall on column C, white wall on column E of a 7x7 board
    fn walled_board() -> Board {
        let mut board = Board::new(BoardSize::Seven);
        let mut changes = Vec::new();
        for y in 1..=7 {
            changes.push((Coordinate::new(3, y), Stone::Black));
            changes.push((Coordinate::new(5, y), Stone::White));
        }
        board.set_stones(&changes).unwrap();
        board
    }

    #[test]
    fn empty_board_has_no_territory() {
        let board = Board::new(BoardSize::Nine);
        let marks = ScoringMarks::from_dead_stones(&board, []);
        assert!(marks.territory.is_empty());
        let score = calculate_score(&board, &marks, context(ScoringSystem::TerritoryScoring));
        assert_eq!(score.margin(), -6.5);
        assert_eq!(score.to_string(), "W+6.5");
    }

    #[test]
    fn territory_counts_enclosed_points() {
        let board = walled_board();
        let marks = ScoringMarks::from_dead_stones(&board, []);
        // Columns A-B are Black's, F-G White's, D is neutral
        assert_eq!(marks.territory.get(&c("A1")), Some(&Color::Black));
        assert_eq!(marks.territory.get(&c("G7")), Some(&Color::White));
        assert_eq!(marks.territory.get(&c("D4")), None);

        let score = calculate_score(&board, &marks, context(ScoringSystem::TerritoryScoring));
        assert_eq!(score.black.territory, 14);
        assert_eq!(score.white.territory, 14);
        assert_eq!(score.winner(), Some(Color::White));

        let area = calculate_score(&board, &marks, context(ScoringSystem::AreaScoring));
        assert_eq!(area.black.total, 21.0);
        assert_eq!(area.white.total, 27.5);
    }

    #[test]
    fn dead_stones_become_territory() {
        let mut board = walled_board();
        board.set_stones(&[(c("A4"), Stone::White)]).unwrap();
        let marks = ScoringMarks::from_dead_stones(&board, [c("A4"), c("D4")]);
        assert!(marks.is_dead(c("A4")));
        assert!(!marks.is_dead(c("D4")));
        assert_eq!(marks.territory.get(&c("A4")), Some(&Color::Black));

        let score = calculate_score(&board, &marks, context(ScoringSystem::TerritoryScoring));
        assert_eq!(score.black.territory, 14);
        assert_eq!(score.black.dead_stones, 1);
        assert_eq!(score.black.total, 15.0);
    }

    #[test]
    fn handicap_compensation_under_area_scoring() {
        let board = Board::new(BoardSize::Nine);
        let marks = ScoringMarks::default();
        let score = calculate_score(
            &board,
            &marks,
            ScoreContext {
                system: ScoringSystem::AreaScoring,
                komi: 0.5,
                handicap: 3,
                prisoners: (0, 0),
            },
        );
        assert_eq!(score.white.handicap_compensation, 3.0);
        assert_eq!(score.white.total, 3.5);
    }
}
