//! Computer opponent: move selection in three strengths.
//!
//! - [`Tier::Weak`] plays a uniformly random empty cell.
//! - [`Tier::Balanced`] wins if it can, blocks an immediate loss, prefers the
//!   centre and then the corners, and otherwise plays randomly.
//! - [`Tier::Strong`] adds blocking of developing opponent shapes and replaces
//!   the random fallback with a depth-2 minimax with alpha-beta pruning over
//!   [`evaluate`].
//!
//! Randomness comes from a per-opponent [`fastrand::Rng`], so a seeded
//! opponent replays the same choices.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::board::{Board, Color, Point};
use crate::constants::{CENTER, CORNERS, SEARCH_DEPTH};
use crate::error::GameError;
use crate::evaluate::evaluate;
use crate::patterns::{find_threat_block, Threat};
use crate::rules::wins_immediately;

/// Opponent strength.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tier {
    Weak,
    #[default]
    Balanced,
    Strong,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::Weak => "weak",
            Tier::Balanced => "balanced",
            Tier::Strong => "strong",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier '{0}' (expected weak, balanced or strong)")]
pub struct ParseTierError(String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weak" | "easy" => Ok(Tier::Weak),
            "balanced" | "medium" => Ok(Tier::Balanced),
            "strong" | "hard" => Ok(Tier::Strong),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

/// Why a move was chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reason {
    Random,
    Win,
    Block,
    Threat(Threat),
    Positional,
    Search { score: f64, nodes: u64 },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Random => write!(f, "random"),
            Reason::Win => write!(f, "immediate win"),
            Reason::Block => write!(f, "block immediate loss"),
            Reason::Threat(t) => write!(f, "block {t}"),
            Reason::Positional => write!(f, "positional preference"),
            Reason::Search { score, nodes } => write!(f, "search score={score:.2} nodes={nodes}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decision {
    pub point: Point,
    pub reason: Reason,
}

/// A computer player of a fixed tier.
#[derive(Clone, Debug)]
pub struct Opponent {
    tier: Tier,
    rng: fastrand::Rng,
}

impl Opponent {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            rng: fastrand::Rng::new(),
        }
    }

    /// Opponent whose random choices are reproducible.
    pub fn with_seed(tier: Tier, seed: u64) -> Self {
        Self {
            tier,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn name(&self) -> String {
        format!("computer-{}", self.tier)
    }

    /// Choose a move for `color`.
    ///
    /// Fails with [`GameError::SearchPrecondition`] when the board has no
    /// empty cell.
    pub fn select_move(&mut self, board: &Board, color: Color) -> Result<Point, GameError> {
        self.decide(board, color).map(|d| d.point)
    }

    /// Like [`Opponent::select_move`], also reporting which rule fired.
    pub fn decide(&mut self, board: &Board, color: Color) -> Result<Decision, GameError> {
        let moves = board.empty_points();
        if moves.is_empty() {
            return Err(GameError::SearchPrecondition("board is full"));
        }
        let decision = match self.tier {
            Tier::Weak => self.random(&moves),
            Tier::Balanced => {
                tactical(board, color, &moves).unwrap_or_else(|| self.random(&moves))
            }
            Tier::Strong => strong(board, color, &moves)?,
        };
        debug!(
            "{} plays {:?} for {color}: {}",
            self.name(),
            decision.point,
            decision.reason
        );
        Ok(decision)
    }

    fn random(&mut self, moves: &[Point]) -> Decision {
        Decision {
            point: moves[self.rng.usize(..moves.len())],
            reason: Reason::Random,
        }
    }
}

/// First move in `moves` that wins on the spot for `color`.
pub fn find_winning_move(board: &Board, color: Color, moves: &[Point]) -> Option<Point> {
    moves
        .iter()
        .copied()
        .find(|&pt| wins_immediately(board, pt, color))
}

/// First free centre cell, else first free corner.
pub fn strategic_move(board: &Board) -> Option<Point> {
    CENTER
        .iter()
        .chain(CORNERS.iter())
        .copied()
        .find(|&(r, c)| board.is_empty_at(r, c))
}

fn win_or_block(board: &Board, color: Color, moves: &[Point]) -> Option<Decision> {
    if let Some(point) = find_winning_move(board, color, moves) {
        return Some(Decision {
            point,
            reason: Reason::Win,
        });
    }
    find_winning_move(board, color.opponent(), moves).map(|point| Decision {
        point,
        reason: Reason::Block,
    })
}

fn positional(board: &Board) -> Option<Decision> {
    strategic_move(board).map(|point| Decision {
        point,
        reason: Reason::Positional,
    })
}

/// The deterministic part of the balanced strategy.
fn tactical(board: &Board, color: Color, moves: &[Point]) -> Option<Decision> {
    win_or_block(board, color, moves).or_else(|| positional(board))
}

fn strong(board: &Board, color: Color, moves: &[Point]) -> Result<Decision, GameError> {
    if let Some(decision) = win_or_block(board, color, moves) {
        return Ok(decision);
    }
    if let Some((threat, point)) = find_threat_block(board, color.opponent()) {
        return Ok(Decision {
            point,
            reason: Reason::Threat(threat),
        });
    }
    if let Some(decision) = positional(board) {
        return Ok(decision);
    }
    let result = best_minimax_move(board, color)?;
    Ok(Decision {
        point: result.point,
        reason: Reason::Search {
            score: result.score,
            nodes: result.nodes,
        },
    })
}

/// Result of a root minimax search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub point: Point,
    pub score: f64,
    /// Positions visited below the root.
    pub nodes: u64,
}

/// Depth-2 minimax over every empty cell, maximizing [`evaluate`] for `color`.
///
/// Ties keep the first move in row-major order. Fails with
/// [`GameError::SearchPrecondition`] on a full board.
pub fn best_minimax_move(board: &Board, color: Color) -> Result<SearchResult, GameError> {
    let moves = board.empty_points();
    if moves.is_empty() {
        return Err(GameError::SearchPrecondition("board is full"));
    }

    let mut nodes = 0;
    let mut best_point = moves[0];
    let mut best_score = f64::NEG_INFINITY;
    let mut alpha = f64::NEG_INFINITY;

    for pt in moves {
        let child = board.with_stone(pt, color);
        let score = minimax(
            &child,
            SEARCH_DEPTH - 1,
            false,
            color,
            alpha,
            f64::INFINITY,
            &mut nodes,
        );
        if score > best_score {
            best_score = score;
            best_point = pt;
        }
        alpha = alpha.max(best_score);
    }

    Ok(SearchResult {
        point: best_point,
        score: best_score,
        nodes,
    })
}

/// Alpha-beta minimax; scores are always from `color`'s perspective.
///
/// `maximizing` is true when `color` is to move on `board`.
pub fn minimax(
    board: &Board,
    depth: usize,
    maximizing: bool,
    color: Color,
    mut alpha: f64,
    mut beta: f64,
    nodes: &mut u64,
) -> f64 {
    *nodes += 1;
    if depth == 0 || board.is_full() {
        return evaluate(board, color);
    }

    let mover = if maximizing { color } else { color.opponent() };
    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for pt in board.empty_points() {
        let child = board.with_stone(pt, mover);
        let score = minimax(&child, depth - 1, !maximizing, color, alpha, beta, nodes);
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!("hard".parse::<Tier>(), Ok(Tier::Strong));
        assert_eq!("Balanced".parse::<Tier>(), Ok(Tier::Balanced));
        assert_eq!("easy".parse::<Tier>(), Ok(Tier::Weak));
        assert!("expert".parse::<Tier>().is_err());
    }

    #[test]
    fn test_full_board_is_precondition_error() {
        let board = Board::from_rows(&["WBWBWB"; 6]);
        for tier in [Tier::Weak, Tier::Balanced, Tier::Strong] {
            let mut opp = Opponent::with_seed(tier, 1);
            assert!(matches!(
                opp.select_move(&board, Color::Black),
                Err(GameError::SearchPrecondition(_))
            ));
        }
        assert_eq!(
            best_minimax_move(&board, Color::White),
            Err(GameError::SearchPrecondition("board is full"))
        );
    }

    #[test]
    fn test_weak_is_reproducible_with_seed() {
        let board = Board::from_rows(&["WB....", "..W..."]);
        let a = Opponent::with_seed(Tier::Weak, 42).select_move(&board, Color::Black);
        let b = Opponent::with_seed(Tier::Weak, 42).select_move(&board, Color::Black);
        assert_eq!(a, b);
        let (r, c) = a.unwrap();
        assert!(board.is_empty_at(r, c));
    }

    #[test]
    fn test_balanced_takes_win() {
        let board = Board::from_rows(&["BB....", "BB....", "B.....", "WWWW.."]);
        let mut opp = Opponent::with_seed(Tier::Balanced, 0);
        let d = opp.decide(&board, Color::Black).unwrap();
        assert_eq!(d.point, (2, 1));
        assert_eq!(d.reason, Reason::Win);
    }

    #[test]
    fn test_balanced_blocks() {
        let board = Board::from_rows(&["", "", "", "WWWW..", "B.B..."]);
        let mut opp = Opponent::with_seed(Tier::Balanced, 0);
        let d = opp.decide(&board, Color::Black).unwrap();
        assert_eq!(d.point, (3, 4));
        assert_eq!(d.reason, Reason::Block);
    }

    #[test]
    fn test_balanced_prefers_center_then_corners() {
        let mut opp = Opponent::with_seed(Tier::Balanced, 0);
        assert_eq!(opp.select_move(&Board::new(), Color::Black), Ok((2, 2)));
        let board = Board::from_rows(&["", "", "..WB..", "..BW.."]);
        assert_eq!(opp.select_move(&board, Color::White), Ok((0, 0)));
    }

    #[test]
    fn test_strong_blocks_open_three() {
        let board = Board::from_rows(&["", ".WWW..", "..BB..", "..BW.."]);
        let mut opp = Opponent::with_seed(Tier::Strong, 0);
        let d = opp.decide(&board, Color::Black).unwrap();
        assert_eq!(d.reason, Reason::Threat(Threat::OpenThree));
        assert_eq!(d.point, (1, 4));
    }

    #[test]
    fn test_strong_falls_back_to_search() {
        let board = Board::from_rows(&[
            "W....B",
            "......",
            "..WB..",
            "..BW..",
            "......",
            "B....W",
        ]);
        let mut opp = Opponent::with_seed(Tier::Strong, 0);
        let d = opp.decide(&board, Color::White).unwrap();
        assert!(matches!(d.reason, Reason::Search { .. }));
        let (r, c) = d.point;
        assert!(board.is_empty_at(r, c));
    }

    #[test]
    fn test_minimax_depth_zero_is_evaluate() {
        let board = Board::from_rows(&["WB"]);
        let mut nodes = 0;
        let score = minimax(
            &board,
            0,
            true,
            Color::White,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut nodes,
        );
        assert_eq!(score, evaluate(&board, Color::White));
        assert_eq!(nodes, 1);
    }
}
