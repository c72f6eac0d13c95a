//! Threat patterns on the board.
//!
//! Two families of scans live here:
//!
//! ## Potential counts
//! Shapes one stone away from a win condition: a rectangle with five of six
//! cells owned, a quota block with three of four, and a five-cell line window
//! with four. The evaluator weighs these counts.
//!
//! ## Blocking scans
//! Cells that break an opponent's developing shape: open fours, open threes,
//! rectangles and quota blocks missing one cell. The strong opponent plays the
//! first hit before falling back to search.

use std::fmt;

use crate::board::{Board, Color, Point};
use crate::constants::{N, RUN_TO_WIN};
use crate::rules::{quota_blocks, rectangles, run_length, Direction, Rect};

/// Owned and empty cell counts inside a shape.
fn tally<I: IntoIterator<Item = Point>>(board: &Board, cells: I, color: Color) -> (usize, usize, Option<Point>) {
    let mut own = 0;
    let mut empty = 0;
    let mut gap = None;
    for (r, c) in cells {
        match board.get(r, c) {
            Some(c2) if c2 == color => own += 1,
            None => {
                empty += 1;
                gap = Some((r, c));
            }
            _ => {}
        }
    }
    (own, empty, gap)
}

/// The single empty cell of `rect` when every other cell belongs to `color`.
fn missing_one(board: &Board, rect: &Rect, color: Color) -> Option<Point> {
    let size = rect.rows * rect.cols;
    match tally(board, rect.points(), color) {
        (own, 1, gap) if own == size - 1 => gap,
        _ => None,
    }
}

/// Rectangles (3x2 or 2x3) with five cells owned and one empty.
pub fn count_near_rectangles(board: &Board, color: Color) -> usize {
    rectangles()
        .filter(|rect| missing_one(board, rect, color).is_some())
        .count()
}

/// Quota blocks with three cells owned and one empty.
pub fn count_near_blocks(board: &Board, color: Color) -> usize {
    quota_blocks()
        .filter(|block| missing_one(board, block, color).is_some())
        .count()
}

/// Five-cell line windows holding four `color` stones and one empty cell.
pub fn count_near_fives(board: &Board, color: Color) -> usize {
    let mut count = 0;
    for row in 0..N {
        for col in 0..N {
            for dir in Direction::ALL {
                let Some(window) = dir.window((row, col), RUN_TO_WIN) else {
                    continue;
                };
                if let (4, 1, _) = tally(board, window, color) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Empty cell completing the first rectangle `color` is one stone short of.
pub fn rectangle_gap(board: &Board, color: Color) -> Option<Point> {
    rectangles().find_map(|rect| missing_one(board, &rect, color))
}

/// Empty cell completing the first quota block `color` is one stone short of.
pub fn block_gap(board: &Board, color: Color) -> Option<Point> {
    quota_blocks().find_map(|block| missing_one(board, &block, color))
}

fn empty_step(board: &Board, pt: Point, dir: Direction, k: isize) -> Option<Point> {
    dir.step(pt, k).filter(|&(r, c)| board.is_empty_at(r, c))
}

/// Runs of exactly `len` `color` stones, as `(start, direction)` in scan order.
fn exact_runs(board: &Board, color: Color, len: usize) -> Vec<(Point, Direction)> {
    let mut out = Vec::new();
    for row in 0..N {
        for col in 0..N {
            if board.get(row, col) != Some(color) {
                continue;
            }
            for dir in Direction::ALL {
                let extends_back = dir
                    .step((row, col), -1)
                    .is_some_and(|(r, c)| board.get(r, c) == Some(color));
                if !extends_back && run_length(board, (row, col), dir, color) == len {
                    out.push(((row, col), dir));
                }
            }
        }
    }
    out
}

/// Blocking cell for the first open three of `color`.
///
/// Both ends of the run must be empty. The end whose next cell is also empty
/// (the side that would grow into an open four) is preferred, forward end
/// first.
pub fn open_three_block(board: &Board, color: Color) -> Option<Point> {
    for (start, dir) in exact_runs(board, color, 3) {
        let (Some(after), Some(before)) = (
            empty_step(board, start, dir, 3),
            empty_step(board, start, dir, -1),
        ) else {
            continue;
        };
        if empty_step(board, start, dir, 4).is_some() {
            return Some(after);
        }
        if empty_step(board, start, dir, -2).is_some() {
            return Some(before);
        }
        return Some(after);
    }
    None
}

/// Blocking cell for the first four-in-a-row of `color` with an open end.
pub fn open_four_block(board: &Board, color: Color) -> Option<Point> {
    exact_runs(board, color, 4).into_iter().find_map(|(start, dir)| {
        empty_step(board, start, dir, 4).or_else(|| empty_step(board, start, dir, -1))
    })
}

/// Kind of opponent shape a blocking move answers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Threat {
    OpenFour,
    OpenThree,
    Rectangle,
    QuotaBlock,
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Threat::OpenFour => "open four",
            Threat::OpenThree => "open three",
            Threat::Rectangle => "rectangle",
            Threat::QuotaBlock => "quota block",
        };
        f.write_str(s)
    }
}

/// First blocking move against `opponent`, checking open fours, open threes,
/// near rectangles and near quota blocks in that order.
pub fn find_threat_block(board: &Board, opponent: Color) -> Option<(Threat, Point)> {
    open_four_block(board, opponent)
        .map(|pt| (Threat::OpenFour, pt))
        .or_else(|| open_three_block(board, opponent).map(|pt| (Threat::OpenThree, pt)))
        .or_else(|| rectangle_gap(board, opponent).map(|pt| (Threat::Rectangle, pt)))
        .or_else(|| block_gap(board, opponent).map(|pt| (Threat::QuotaBlock, pt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_rectangle_count_and_gap() {
        let board = Board::from_rows(&["BB....", "BB....", "B....."]);
        assert_eq!(count_near_rectangles(&board, Color::Black), 1);
        assert_eq!(rectangle_gap(&board, Color::Black), Some((2, 1)));
        assert_eq!(count_near_rectangles(&board, Color::White), 0);
    }

    #[test]
    fn test_blocked_rectangle_is_not_near() {
        let board = Board::from_rows(&["BB....", "BB....", "BW...."]);
        assert_eq!(count_near_rectangles(&board, Color::Black), 0);
        assert_eq!(rectangle_gap(&board, Color::Black), None);
    }

    #[test]
    fn test_near_block() {
        let board = Board::from_rows(&["", "", "..WW..", "..W..."]);
        assert_eq!(count_near_blocks(&board, Color::White), 1);
        assert_eq!(block_gap(&board, Color::White), Some((3, 3)));
    }

    #[test]
    fn test_near_fives() {
        // One window (cols 0-4) has four stones and a gap.
        let board = Board::from_rows(&["WW.WW."]);
        assert_eq!(count_near_fives(&board, Color::White), 1);
        // Both windows of the row qualify.
        let board = Board::from_rows(&[".WWWW."]);
        assert_eq!(count_near_fives(&board, Color::White), 2);
    }

    #[test]
    fn test_open_three_prefers_side_with_room() {
        let board = Board::from_rows(&[".BBB.."]);
        // after = (0,4), next beyond = (0,5) empty
        assert_eq!(open_three_block(&board, Color::Black), Some((0, 4)));
        let board = Board::from_rows(&["..BBB."]);
        // after = (0,5), nothing beyond; before = (0,1) with (0,0) empty
        assert_eq!(open_three_block(&board, Color::Black), Some((0, 1)));
    }

    #[test]
    fn test_closed_three_is_ignored() {
        let board = Board::from_rows(&["BBB..."]);
        assert_eq!(open_three_block(&board, Color::Black), None);
        let board = Board::from_rows(&["WBBB.."]);
        assert_eq!(open_three_block(&board, Color::Black), None);
    }

    #[test]
    fn test_four_is_not_three() {
        let board = Board::from_rows(&[".BBBB."]);
        assert_eq!(open_three_block(&board, Color::Black), None);
        assert_eq!(open_four_block(&board, Color::Black), Some((0, 5)));
    }

    #[test]
    fn test_open_four_backwards() {
        let board = Board::from_rows(&["", "", "", "", "..WWWW"]);
        assert_eq!(open_four_block(&board, Color::White), Some((4, 1)));
    }

    #[test]
    fn test_threat_order() {
        // Three on row 0 and four in column 5: the four is answered first.
        let board = Board::from_rows(&[".BBB..", ".....B", ".....B", ".....B", ".....B"]);
        assert_eq!(find_threat_block(&board, Color::Black), Some((Threat::OpenFour, (5, 5))));
    }

    #[test]
    fn test_no_threats_on_empty_board() {
        assert_eq!(find_threat_block(&Board::new(), Color::White), None);
    }
}
