// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive play over stdin/stdout

use crate::render::render_board;
use anyhow::{anyhow, Context, Result};
use goban_core::{Color, Coordinate, Game, GameStatus, Score};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(Coordinate),
    Pass,
    Resign,
    Undo,
    Back,
    /// Follow the current variation, or the given child (1-based)
    Forward(Option<usize>),
    Variations,
    Goto(usize),
    Resume(Option<Color>),
    Score(Vec<Coordinate>),
    Show,
    Save(PathBuf),
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  play D4 | D4       place a stone for the player to move
  pass | resign
  undo               take back the last move
  back | forward [N] walk the record; N picks a variation
  variations         list continuations of the current node
  goto N             jump to move N of this variation (0 = start)
  resume [black|white]  continue after the game ended by passes
  score [D4 E5 ...]  count with the given stones marked dead
  show               print the board again
  save FILE          write the record (.cbor for binary, else JSON)
  quit";

pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let head = words.next().ok_or_else(|| anyhow!("Empty command"))?.to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    let command = match (head.as_str(), rest.as_slice()) {
        ("play", [label]) => Command::Play(Coordinate::from_label(label)?),
        ("pass", []) => Command::Pass,
        ("resign", []) => Command::Resign,
        ("undo", []) => Command::Undo,
        ("back", []) => Command::Back,
        ("forward", []) => Command::Forward(None),
        ("forward", [n]) => Command::Forward(Some(n.parse().context("Variation must be a number")?)),
        ("variations", []) => Command::Variations,
        ("goto", [n]) => Command::Goto(n.parse().context("Move number must be a number")?),
        ("resume", []) => Command::Resume(None),
        ("resume", [color]) => Command::Resume(Some(parse_color(color)?)),
        ("score", dead) => Command::Score(
            dead.iter()
                .map(|label| Coordinate::from_label(label))
                .collect::<Result<_, _>>()?,
        ),
        ("show", []) => Command::Show,
        ("save", [file]) => Command::Save(PathBuf::from(file)),
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (label, []) => Command::Play(
            Coordinate::from_label(label).map_err(|_| anyhow!("Unknown command '{line}'. Type 'help'."))?,
        ),
        _ => return Err(anyhow!("Unknown command '{line}'. Type 'help'.")),
    };
    Ok(command)
}

fn parse_color(word: &str) -> Result<Color> {
    match word.to_ascii_lowercase().as_str() {
        "b" | "black" => Ok(Color::Black),
        "w" | "white" => Ok(Color::White),
        _ => Err(anyhow!("Expected black or white, got '{word}'")),
    }
}

/// Read commands until `quit` or end of input
pub fn run<R: BufRead, W: Write>(game: &mut Game, input: R, output: &mut W) -> Result<()> {
    print_position(game, output)?;
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "error: {e}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = execute(game, command, output) {
            writeln!(output, "error: {e:#}")?;
        }
    }
    Ok(())
}

fn execute<W: Write>(game: &mut Game, command: Command, output: &mut W) -> Result<()> {
    match command {
        Command::Play(coord) => {
            let captured = game.play(coord)?;
            if !captured.is_empty() {
                writeln!(output, "Captured {}", labels(&captured))?;
            }
            print_position(game, output)?;
        }
        Command::Pass => {
            game.pass()?;
            print_position(game, output)?;
        }
        Command::Resign => {
            game.resign()?;
            print_status(game, output)?;
        }
        Command::Undo => {
            game.undo()?;
            print_position(game, output)?;
        }
        Command::Back => {
            game.go_back()?;
            print_position(game, output)?;
        }
        Command::Forward(None) => {
            game.go_forward()?;
            print_position(game, output)?;
        }
        Command::Forward(Some(n)) => {
            let child = n
                .checked_sub(1)
                .and_then(|i| game.tree().children(game.current_node()).get(i).copied())
                .ok_or_else(|| anyhow!("No variation {n} here"))?;
            game.go_to(child)?;
            print_position(game, output)?;
        }
        Command::Variations => print_variations(game, output)?,
        Command::Goto(n) => {
            game.go_to_move(n)?;
            print_position(game, output)?;
        }
        Command::Resume(first) => {
            game.resume_play(first)?;
            print_status(game, output)?;
        }
        Command::Score(dead) => print_score(&game.score_with_dead_stones(&dead), output)?,
        Command::Show => print_position(game, output)?,
        Command::Save(path) => {
            save_record(game, &path)?;
            writeln!(output, "Saved {}", path.display())?;
        }
        Command::Help => writeln!(output, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

/// Write the record as JSON, or CBOR for a `.cbor` path
pub fn save_record(game: &Game, path: &Path) -> Result<()> {
    let record = game.to_record();
    let bytes = if path.extension().map_or(false, |ext| ext == "cbor") {
        record.to_cbor()?
    } else {
        record.to_json()?.into_bytes()
    };
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn labels(coords: &[Coordinate]) -> String {
    coords.iter().map(Coordinate::label).collect::<Vec<_>>().join(" ")
}

pub fn print_position<W: Write>(game: &Game, output: &mut W) -> Result<()> {
    let last = game
        .tree()
        .node(game.current_node())
        .and_then(|node| node.mv())
        .and_then(|mv| mv.coordinate());
    writeln!(output, "\n{}", render_board(game.board(), last))?;
    writeln!(
        output,
        "Move {}  Captures: Black {} - White {}",
        game.move_number(),
        game.prisoners(Color::Black),
        game.prisoners(Color::White)
    )?;
    print_status(game, output)
}

fn print_status<W: Write>(game: &Game, output: &mut W) -> Result<()> {
    match game.status() {
        GameStatus::Ended(reason) => {
            writeln!(output, "Game over: {reason}")?;
            match reason.winner() {
                Some(winner) => writeln!(output, "{winner} wins")?,
                None => writeln!(output, "Mark dead stones with 'score', or 'resume' to dispute")?,
            }
        }
        _ => writeln!(output, "{} to move", game.next_player())?,
    }
    Ok(())
}

fn print_variations<W: Write>(game: &Game, output: &mut W) -> Result<()> {
    let tree = game.tree();
    let current = game.current_node();
    let children = tree.children(current);
    if children.is_empty() {
        writeln!(output, "No continuations")?;
        return Ok(());
    }
    let active = tree.active_child(current);
    for (i, &child) in children.iter().enumerate() {
        let text = tree
            .node(child)
            .and_then(|node| node.mv())
            .map(ToString::to_string)
            .unwrap_or_else(|| "setup".to_string());
        let marker = if Some(child) == active { "*" } else { " " };
        writeln!(output, "{marker}{}) {text}", i + 1)?;
    }
    Ok(())
}

pub fn print_score<W: Write>(score: &Score, output: &mut W) -> Result<()> {
    for (name, side) in [("Black", &score.black), ("White", &score.white)] {
        writeln!(
            output,
            "{name}: territory {} stones {} prisoners {} dead {} komi {} compensation {} = {}",
            side.territory,
            side.stones,
            side.prisoners,
            side.dead_stones,
            side.komi,
            side.handicap_compensation,
            side.total
        )?;
    }
    writeln!(output, "Result: {score}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goban_core::{BoardSize, GameConfig};

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("play D4").unwrap(), Command::Play(Coordinate::new(4, 4)));
        assert_eq!(parse_command("q16").unwrap(), Command::Play(Coordinate::new(16, 16)));
        assert_eq!(parse_command("PASS").unwrap(), Command::Pass);
        assert_eq!(parse_command("forward 2").unwrap(), Command::Forward(Some(2)));
        assert_eq!(parse_command("resume white").unwrap(), Command::Resume(Some(Color::White)));
        assert_eq!(
            parse_command("score A1 B2").unwrap(),
            Command::Score(vec![Coordinate::new(1, 1), Coordinate::new(2, 2)])
        );
        assert!(parse_command("I5").is_err()); // no column I
        assert!(parse_command("goto x").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_session() {
        let mut game = Game::new(GameConfig::with_size(BoardSize::Nine)).unwrap();
        let input = "E5\nE5\nC3\nundo\nvariations\nback\nforward\npass\npass\nscore\nquit\nD4\n";
        let mut output = Vec::new();
        run(&mut game, input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: Intersection already occupied"));
        assert!(text.contains("Game over: two consecutive passes"));
        assert!(text.contains("Result: B+73.5"));
        // Input after quit is ignored
        assert_eq!(game.move_number(), 3);
    }
}
