//! Sixgrid: a 6x6 territory game engine.
//!
//! ## Usage
//!
//! - `sixgrid` - Play a demo game, computer against computer
//! - `sixgrid serve` - Read protocol commands from stdin
//! - `sixgrid demo --white weak --black strong` - Demo with chosen tiers

use std::io;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::info;

use sixgrid::game::{Game, GameId, ParticipantId};
use sixgrid::protocol::TextEngine;
use sixgrid::search::{Opponent, Tier};
use sixgrid::session::SessionConfig;

/// Sixgrid: a 6x6 territory game engine
#[derive(Parser)]
#[command(name = "sixgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. `info` or `sixgrid=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the text command protocol on stdin/stdout
    Serve {
        /// Seed for reproducible computer opponents
        #[arg(long)]
        seed: Option<u64>,
        /// Remove games older than this many hours on cleanup
        #[arg(long, default_value_t = 24)]
        stale_hours: u64,
    },
    /// Play one game between two computer opponents
    Demo {
        #[arg(long, default_value = "balanced")]
        white: Tier,
        #[arg(long, default_value = "strong")]
        black: Tier,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = &cli.log_level {
        logger.parse_filters(filter);
    }
    logger.init();

    match cli.command {
        Some(Commands::Serve { seed, stale_hours }) => {
            let config = SessionConfig {
                max_age: Duration::from_secs(stale_hours * 60 * 60),
                seed,
                ..SessionConfig::default()
            };
            info!("serving protocol on stdin");
            let mut engine = TextEngine::new(config);
            engine.run(io::stdin().lock(), io::stdout().lock())
        }
        Some(Commands::Demo { white, black, seed }) => run_demo(white, black, seed),
        None => run_demo(Tier::Balanced, Tier::Strong, None),
    }
}

fn opponent(tier: Tier, seed: Option<u64>) -> Opponent {
    match seed {
        Some(s) => Opponent::with_seed(tier, s),
        None => Opponent::new(tier),
    }
}

/// Play White's opponent through the human entry point and Black's through
/// the computer entry point, so both paths of the game are exercised.
fn run_demo(white: Tier, black: Tier, seed: Option<u64>) -> Result<()> {
    println!("Sixgrid demo: {white} (white) vs {black} (black)\n");

    let mut game = Game::new(GameId(1), Instant::now());
    let human = ParticipantId(1);
    game.start_against(human, opponent(black, seed))?;
    let mut white_player = opponent(white, seed.map(|s| s.wrapping_add(1)));

    loop {
        let (row, col) = white_player.select_move(game.board(), game.current())?;
        let result = game.apply_human_move(human, row, col)?;
        println!("white plays ({row}, {col})");
        if result.finished {
            break;
        }
        let result = game.apply_opponent_move()?;
        println!("black plays ({}, {})", result.point.0, result.point.1);
        if result.finished {
            break;
        }
    }

    println!("\n{}", game.board());
    match (game.winner(), game.win_condition()) {
        (Some(winner), Some(condition)) => {
            println!("Winner: {winner} ({condition})");
            Ok(())
        }
        _ => bail!("demo ended without a result"),
    }
}
