// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved games reload into the same tree and position

use goban_core::{
    BoardSize, Coordinate, Game, GameConfig, GameRecord, MoveValuation, RecordError, Rules, Stone,
};

fn c(label: &str) -> Coordinate {
    Coordinate::from_label(label).unwrap()
}

fn sample_game() -> Game {
    let config = GameConfig {
        handicap: 4,
        komi: 0.5,
        rules: Rules::chinese(),
        ..GameConfig::with_size(BoardSize::Thirteen)
    };
    let mut game = Game::new(config).unwrap();
    for label in ["G7", "C3", "K3", "C11"] {
        game.play(c(label)).unwrap();
    }
    game.go_back().unwrap();
    game.play(c("K11")).unwrap();
    let node = game.current_node();
    let annotations = game.annotations_mut(node).unwrap();
    annotations.move_valuation = Some(MoveValuation::Good);
    annotations.comment = Some("takes the last corner".into());
    game
}

#[test]
fn cbor_roundtrip_keeps_handicap_and_variations() {
    let game = sample_game();
    let bytes = game.to_record().to_cbor().unwrap();
    let record = GameRecord::from_cbor(&bytes).unwrap();
    let loaded = Game::load(&record).unwrap();

    assert_eq!(loaded.handicap().len(), 4);
    assert_eq!(loaded.config().handicap, 4);
    assert_eq!(loaded.tree().node_count(), game.tree().node_count());
    assert_eq!(loaded.board().count(Stone::Black), 6);
    // Main line is the first continuation, C11
    assert_eq!(loaded.board().stone_at(c("C11")), Ok(Stone::Black));
}

#[test]
fn json_roundtrip_keeps_annotations() {
    let game = sample_game();
    let json = game.to_record().to_json().unwrap();
    let loaded = Game::load(&GameRecord::from_json(&json).unwrap()).unwrap();

    let commented = loaded
        .tree()
        .preorder()
        .into_iter()
        .filter_map(|id| loaded.tree().node(id))
        .find(|node| !node.annotations().is_empty())
        .unwrap();
    assert_eq!(commented.annotations().move_valuation, Some(MoveValuation::Good));
    assert_eq!(commented.mv().and_then(|mv| mv.coordinate()), Some(c("K11")));
}

#[test]
fn garbage_is_an_encoding_error() {
    assert!(matches!(GameRecord::from_cbor(&[0xff, 0x00]), Err(RecordError::Cbor(_))));
    assert!(matches!(GameRecord::from_json("[]"), Err(RecordError::Json(_))));
}
