// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use goban_core::{Board, Coordinate, Stone};

/// Render the board with row numbers on both sides and column letters
/// above and below. The top row is printed first. `last` is drawn in
/// brackets.
pub fn render_board(board: &Board, last: Option<Coordinate>) -> String {
    let size = board.size().value();
    let mut output = String::new();

    let labels = column_labels(size);
    output.push_str(&labels);

    for y in (1..=size).rev() {
        output.push_str(&format!("{y:2} "));
        for x in 1..=size {
            let coord = Coordinate::new(x, y);
            let symbol = match board.stone_at(coord).unwrap_or_default() {
                Stone::Black => '●',
                Stone::White => '○',
                Stone::Empty if board.is_star_point(coord) => '+',
                Stone::Empty => '·',
            };
            if last == Some(coord) {
                output.push_str(&format!("[{symbol}"));
            } else if x > 1 && last == Some(Coordinate::new(x - 1, y)) {
                output.push_str(&format!("]{symbol}"));
            } else {
                output.push_str(&format!(" {symbol}"));
            }
        }
        if last == Some(Coordinate::new(size, y)) {
            output.push(']');
        } else {
            output.push(' ');
        }
        output.push_str(&format!("{y}\n"));
    }

    output.push_str(&labels);
    output
}

fn column_labels(size: u8) -> String {
    let mut line = String::from("   ");
    for x in 1..=size {
        line.push(' ');
        line.push(Coordinate::column_letter(x));
    }
    line.push('\n');
    line
}
