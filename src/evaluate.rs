//! Static board evaluation.
//!
//! The score is a weighted sum from one color's point of view:
//!
//! ```text
//! 10 * (area(own) - area(opp)) + 5 * (potential(own) - potential(opp)) + 2 * center(own)
//! ```
//!
//! where `area` is the largest region plus a tenth of all owned cells,
//! `potential` counts shapes one stone from a win, and `center` rewards owned
//! and still-open centre cells. The function is a heuristic; its only
//! guarantee is that identical boards score identically.

use crate::board::{Board, Color};
use crate::constants::{
    CENTER, CENTER_EMPTY, CENTER_OWNED, POT_BLOCK, POT_FIVE, POT_RECT, W_AREA, W_CENTER,
    W_POTENTIAL, W_TOTAL_AREA,
};
use crate::patterns::{count_near_blocks, count_near_fives, count_near_rectangles};

/// Largest region plus a tenth of the total area across all regions.
pub fn connected_area_score(board: &Board, color: Color) -> f64 {
    let mut largest = 0;
    let mut total = 0;
    for region in board.regions(color) {
        largest = largest.max(region.len());
        total += region.len();
    }
    largest as f64 + total as f64 * W_TOTAL_AREA
}

/// Weighted count of shapes one stone away from a win.
pub fn potential_score(board: &Board, color: Color) -> f64 {
    count_near_rectangles(board, color) as f64 * POT_RECT
        + count_near_blocks(board, color) as f64 * POT_BLOCK
        + count_near_fives(board, color) as f64 * POT_FIVE
}

pub fn center_control(board: &Board, color: Color) -> f64 {
    CENTER
        .iter()
        .map(|&(r, c)| match board.get(r, c) {
            Some(owner) if owner == color => CENTER_OWNED,
            None => CENTER_EMPTY,
            _ => 0.0,
        })
        .sum()
}

/// Score `board` for `color`; higher is better for `color`.
pub fn evaluate(board: &Board, color: Color) -> f64 {
    let opp = color.opponent();
    W_AREA * connected_area_score(board, color) - W_AREA * connected_area_score(board, opp)
        + W_POTENTIAL * potential_score(board, color)
        - W_POTENTIAL * potential_score(board, opp)
        + W_CENTER * center_control(board, color)
}
