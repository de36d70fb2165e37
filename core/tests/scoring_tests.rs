// SPDX-License-Identifier: MIT OR Apache-2.0

use goban_core::{
    BoardSize, Color, Coordinate, Game, GameConfig, Rules, ScoringMarks, ScoringSystem, Setup,
};

fn c(label: &str) -> Coordinate {
    Coordinate::from_label(label).unwrap()
}

/// 7x7 split by a black wall on column C and a white wall on column E,
/// with a white invader at A4.
fn walled_game(rules: Rules, komi: f32) -> Game {
    let config = GameConfig {
        komi,
        rules,
        ..GameConfig::with_size(BoardSize::Seven)
    };
    let mut game = Game::new(config).unwrap();
    let column = |letter: char| (1..=7).map(move |y| c(&format!("{letter}{y}")));
    game.setup(Setup {
        black: column('C').collect(),
        white: column('E').chain([c("A4")]).collect(),
        ..Setup::default()
    })
    .unwrap();
    game
}

#[test]
fn territory_scoring_counts_dead_stones_as_prisoners() {
    let game = walled_game(Rules::japanese(), 6.5);
    let score = game.score_with_dead_stones(&[c("A4")]);
    assert_eq!(score.system, ScoringSystem::TerritoryScoring);
    assert_eq!(score.black.territory, 14);
    assert_eq!(score.black.dead_stones, 1);
    assert_eq!(score.white.territory, 14);
    assert_eq!(score.black.total, 15.0);
    assert_eq!(score.white.total, 20.5);
    assert_eq!(score.winner(), Some(Color::White));
    assert_eq!(score.to_string(), "W+5.5");
}

#[test]
fn living_invader_spoils_territory() {
    let game = walled_game(Rules::japanese(), 6.5);
    let score = game.score(&ScoringMarks::from_dead_stones(game.board(), []));
    assert_eq!(score.black.territory, 0);
    assert_eq!(score.white.territory, 14);
}

#[test]
fn area_scoring_counts_stones() {
    let game = walled_game(Rules::chinese(), 7.0);
    let score = game.score_with_dead_stones(&[c("A4")]);
    assert_eq!(score.black.stones, 7);
    assert_eq!(score.white.stones, 7);
    assert_eq!(score.black.total, 21.0);
    assert_eq!(score.white.total, 28.0);
    assert_eq!(score.margin(), -7.0);
}

#[test]
fn jigo_has_no_winner() {
    let game = walled_game(Rules::chinese(), 0.0);
    let score = game.score_with_dead_stones(&[c("A4")]);
    assert_eq!(score.winner(), None);
    assert_eq!(score.to_string(), "Jigo");
}

#[test]
fn prisoners_from_play_are_counted() {
    let mut game = Game::new(GameConfig::with_size(BoardSize::Nine)).unwrap();
    for label in ["D5", "E5", "F5", "J9", "E6", "J8"] {
        game.play(c(label)).unwrap();
    }
    assert_eq!(game.play(c("E4")).unwrap(), vec![c("E5")]);
    let score = game.score(&ScoringMarks::default());
    assert_eq!(score.black.prisoners, 1);
    assert_eq!(score.white.prisoners, 0);
}
