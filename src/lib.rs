//! Sixgrid: a two-color territory game on a 6x6 board with a computer opponent.
//!
//! Players alternate placing stones; stones are never removed. A move wins by
//! completing a 3x2 or 2x3 rectangle, five in a row, or two of the nine fixed
//! 2x2 blocks. A full board goes to the color with the larger connected area.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluator weights and session limits
//! - [`board`] - Grid value and connected-region analysis
//! - [`rules`] - Move application and win detection
//! - [`patterns`] - Near-win shapes and blocking scans
//! - [`evaluate`] - Static evaluation for the search
//! - [`search`] - Computer opponent tiers and alpha-beta minimax
//! - [`game`] - One game's players, turns and lifecycle
//! - [`session`] - In-memory registry of games, players and chat
//! - [`protocol`] - Text command protocol over a registry
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use std::time::Instant;
//! use sixgrid::game::{Game, GameId, ParticipantId, Status};
//! use sixgrid::search::{Opponent, Tier};
//!
//! let mut game = Game::new(GameId(1), Instant::now());
//! let human = ParticipantId(1);
//! game.start_against(human, Opponent::with_seed(Tier::Strong, 7)).unwrap();
//!
//! game.apply_human_move(human, 0, 0).unwrap();
//! let reply = game.apply_opponent_move().unwrap();
//! println!("computer played {:?}", reply.point);
//! assert_eq!(game.status(), Status::Playing);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod patterns;
pub mod protocol;
pub mod rules;
pub mod search;
pub mod session;
