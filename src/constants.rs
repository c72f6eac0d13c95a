//! Constants for board geometry, win conditions, evaluator weights and
//! session limits.
//!
//! The board is a fixed 6x6 grid. Every scan in the crate is written against
//! these constants rather than literal numbers.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 6;

/// Total number of cells.
pub const CELLS: usize = N * N;

/// Side length of a quota block.
pub const BLOCK: usize = 2;

/// Number of quota blocks per row/column of blocks (3x3 tiling).
pub const BLOCKS_PER_SIDE: usize = N / BLOCK;

// =============================================================================
// Win Conditions
// =============================================================================

/// Long side of the rectangle win shape (3x2 or 2x3).
pub const RECT_LONG: usize = 3;

/// Short side of the rectangle win shape.
pub const RECT_SHORT: usize = 2;

/// Minimum run length for the five-in-a-row win.
pub const RUN_TO_WIN: usize = 5;

/// Number of fully owned quota blocks needed to win.
pub const BLOCKS_TO_WIN: usize = 2;

// =============================================================================
// Positional Preference
// =============================================================================

/// The four central cells, in preference order.
pub const CENTER: [(usize, usize); 4] = [(2, 2), (2, 3), (3, 2), (3, 3)];

/// The four corners, in preference order.
pub const CORNERS: [(usize, usize); 4] = [(0, 0), (0, N - 1), (N - 1, 0), (N - 1, N - 1)];

// =============================================================================
// Evaluator Weights
// =============================================================================

/// Weight of the connected-area term (own minus opponent).
pub const W_AREA: f64 = 10.0;

/// Fraction of the total owned area added to the largest region.
pub const W_TOTAL_AREA: f64 = 0.1;

/// Weight of the potential-win term (own minus opponent).
pub const W_POTENTIAL: f64 = 5.0;

/// Weight of own centre control.
pub const W_CENTER: f64 = 2.0;

/// Potential weight of a rectangle missing one cell.
pub const POT_RECT: f64 = 3.0;

/// Potential weight of a quota block missing one cell.
pub const POT_BLOCK: f64 = 2.0;

/// Potential weight of a five-cell window with four owned cells.
pub const POT_FIVE: f64 = 4.0;

/// Centre control points for an owned centre cell.
pub const CENTER_OWNED: f64 = 2.0;

/// Centre control points for an empty centre cell.
pub const CENTER_EMPTY: f64 = 0.5;

// =============================================================================
// Search
// =============================================================================

/// Minimax depth in plies, counted from the current position.
pub const SEARCH_DEPTH: usize = 2;

// =============================================================================
// Session Limits
// =============================================================================

/// Chat messages kept per game.
pub const CHAT_HISTORY_LIMIT: usize = 50;

/// Maximum chat message length in characters.
pub const CHAT_MAX_LEN: usize = 500;

/// Age after which a game is removed by cleanup.
pub const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);
