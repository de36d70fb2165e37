// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goban CLI - play or replay Go games in the terminal

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use goban_core::{BoardSize, Game, GameConfig, GameRecord, KoRule, Rules};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod repl;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "goban", about = "Go rules engine in the terminal", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// TOML file with game settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Board size (odd, 7 to 19)
    #[arg(short, long, global = true)]
    size: Option<u8>,

    #[arg(long, global = true)]
    komi: Option<f32>,

    /// Number of handicap stones
    #[arg(long, global = true)]
    handicap: Option<u8>,

    /// Rule preset: japanese, chinese, aga or new_zealand
    #[arg(long, global = true)]
    rules: Option<String>,

    #[arg(long, value_enum, global = true)]
    ko: Option<KoArg>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively on stdin/stdout
    Play,
    /// Load a saved record, replay it and print the final position.
    /// Any settings given on the command line replace the record's.
    Replay {
        file: PathBuf,
    },
    /// Write the effective settings as a TOML config file
    WriteConfig {
        file: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum KoArg {
    None,
    Simple,
    Positional,
    Situational,
}

impl From<KoArg> for KoRule {
    fn from(arg: KoArg) -> Self {
        match arg {
            KoArg::None => KoRule::None,
            KoArg::Simple => KoRule::SimpleKo,
            KoArg::Positional => KoRule::PositionalSuperko,
            KoArg::Situational => KoRule::SituationalSuperko,
        }
    }
}

impl Args {
    /// Were any game settings given on the command line?
    fn has_settings(&self) -> bool {
        self.config.is_some()
            || self.size.is_some()
            || self.komi.is_some()
            || self.handicap.is_some()
            || self.rules.is_some()
            || self.ko.is_some()
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Apply command-line overrides on top of the loaded settings
fn game_config(args: &Args) -> Result<GameConfig> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(name) = &args.rules {
        config.rules = Rules::preset(name).ok_or_else(|| anyhow!("Unknown rule preset '{name}'"))?;
        if args.komi.is_none() {
            config.komi = config.rules.standard_komi();
        }
    }
    if let Some(size) = args.size {
        config.board_size = BoardSize::try_from(size)?;
    }
    if let Some(komi) = args.komi {
        config.komi = komi;
    }
    if let Some(handicap) = args.handicap {
        config.handicap = handicap;
    }
    if let Some(ko) = args.ko {
        config.rules.ko_rule = ko.into();
    }
    config.validate()?;
    Ok(config)
}

fn load_record(path: &Path) -> Result<GameRecord> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let record = if path.extension().map_or(false, |ext| ext == "cbor") {
        GameRecord::from_cbor(&bytes)?
    } else {
        GameRecord::from_json(std::str::from_utf8(&bytes).context("Record is not UTF-8")?)?
    };
    Ok(record)
}

/// Main entry point
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Command::Play => {
            let config = game_config(&args)?;
            let mut game = Game::new(config).context("Failed to create game")?;
            println!("Type 'help' for commands.");
            let stdin = io::stdin();
            repl::run(&mut game, BufReader::new(stdin.lock()), &mut io::stdout())?;
        }
        Command::Replay { file } => {
            let record = load_record(file)?;
            let config = if args.has_settings() {
                game_config(&args)?
            } else {
                record.config.clone()
            };
            let game = Game::from_record(config, &record)
                .with_context(|| format!("Record {} does not replay", file.display()))?;
            repl::print_position(&game, &mut io::stdout())?;
            println!("Variation nodes: {}", game.tree().node_count());
        }
        Command::WriteConfig { file } => {
            config::save_config(&game_config(&args)?, file)?;
            println!("Wrote {}", file.display());
        }
    }

    Ok(())
}
