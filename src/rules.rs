//! Move application and win detection.
//!
//! After every placement the mover's position is tested against four
//! conditions, in fixed priority order:
//!
//! 1. Rectangle control: a 3x2 or 2x3 rectangle fully owned.
//! 2. Five in a row along one of the four line directions.
//! 3. Region quota: two of the nine fixed 2x2 blocks fully owned.
//! 4. Largest connected area, only once the board is full.
//!
//! Only the first matching condition is reported.

use std::fmt;

use log::debug;

use crate::board::{find_largest_connected_area, AreaResult, Board, Color, Point};
use crate::constants::{BLOCK, BLOCKS_PER_SIDE, BLOCKS_TO_WIN, N, RECT_LONG, RECT_SHORT, RUN_TO_WIN};

/// Error from the board-level move primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
}

/// A line direction for runs of stones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Row and column both increase (↘).
    DiagonalDownRight,
    /// Row increases, column decreases (↙).
    DiagonalDownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDownRight,
        Direction::DiagonalDownLeft,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagonalDownRight => "diagonal_down_right",
            Direction::DiagonalDownLeft => "diagonal_down_left",
        }
    }

    /// Move `k` steps from `pt` (negative `k` walks backwards).
    pub fn step(self, (row, col): Point, k: isize) -> Option<Point> {
        let (dr, dc) = self.delta();
        let r = row as isize + dr * k;
        let c = col as isize + dc * k;
        if r < 0 || c < 0 || r >= N as isize || c >= N as isize {
            return None;
        }
        Some((r as usize, c as usize))
    }

    /// The `len` cells starting at `start`, or `None` if any falls off the board.
    pub fn window(self, start: Point, len: usize) -> Option<Vec<Point>> {
        (0..len as isize).map(|k| self.step(start, k)).collect()
    }
}

/// An axis-aligned rectangle of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Rect {
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (self.top..self.top + self.rows)
            .flat_map(move |r| (self.left..self.left + self.cols).map(move |c| (r, c)))
    }
}

/// All 3x2 rectangle positions, then all 2x3 positions (40 on a 6x6 board).
pub fn rectangles() -> impl Iterator<Item = Rect> {
    [(RECT_LONG, RECT_SHORT), (RECT_SHORT, RECT_LONG)]
        .into_iter()
        .flat_map(|(rows, cols)| {
            (0..=N - rows).flat_map(move |top| {
                (0..=N - cols).map(move |left| Rect {
                    top,
                    left,
                    rows,
                    cols,
                })
            })
        })
}

/// The nine fixed, non-overlapping 2x2 quota blocks in row-major order.
pub fn quota_blocks() -> impl Iterator<Item = Rect> {
    (0..BLOCKS_PER_SIDE).flat_map(|br| {
        (0..BLOCKS_PER_SIDE).map(move |bc| Rect {
            top: br * BLOCK,
            left: bc * BLOCK,
            rows: BLOCK,
            cols: BLOCK,
        })
    })
}

/// Final result of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    pub fn color(self) -> Option<Color> {
        match self {
            Winner::White => Some(Color::White),
            Winner::Black => Some(Color::Black),
            Winner::Draw => None,
        }
    }
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

impl From<Option<Color>> for Winner {
    fn from(color: Option<Color>) -> Self {
        color.map_or(Winner::Draw, Winner::from)
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::White => f.write_str("white"),
            Winner::Black => f.write_str("black"),
            Winner::Draw => f.write_str("draw"),
        }
    }
}

/// Why a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WinCondition {
    Rectangle { rows: usize, cols: usize },
    FiveInRow(Direction),
    RegionQuota,
    /// Full board; the larger largest-region wins.
    LargestArea { size: usize },
    /// The opponent left a running game.
    PlayerLeft,
}

impl WinCondition {
    pub fn tag(&self) -> String {
        match self {
            WinCondition::Rectangle { rows, cols } => format!("rectangle_{rows}x{cols}"),
            WinCondition::FiveInRow(dir) => format!("five_in_row_{}", dir.name()),
            WinCondition::RegionQuota => "region_quota".to_string(),
            WinCondition::LargestArea { size } => format!("largest_area_{size}"),
            WinCondition::PlayerLeft => "player_left".to_string(),
        }
    }
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// A resolved end of game produced by [`check_win_conditions`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinOutcome {
    pub winner: Winner,
    pub condition: WinCondition,
    /// Region comparison, present only for the largest-area condition.
    pub area: Option<AreaResult>,
}

/// First 3x2/2x3 rectangle fully owned by `color`.
pub fn find_rectangle(board: &Board, color: Color) -> Option<Rect> {
    rectangles().find(|rect| rect.points().all(|(r, c)| board.get(r, c) == Some(color)))
}

/// Length of the run of `color` starting at `start` and walking along `dir`.
pub fn run_length(board: &Board, start: Point, dir: Direction, color: Color) -> usize {
    let mut len = 0;
    let mut pt = Some(start);
    while let Some((r, c)) = pt {
        if board.get(r, c) != Some(color) {
            break;
        }
        len += 1;
        pt = dir.step((r, c), 1);
    }
    len
}

/// Direction of the first run of at least five `color` stones.
///
/// Every owned cell is tried as a run start; overlapping runs are counted
/// more than once, which is harmless for an existence check.
pub fn find_five_in_row(board: &Board, color: Color) -> Option<Direction> {
    for row in 0..N {
        for col in 0..N {
            if board.get(row, col) != Some(color) {
                continue;
            }
            for dir in Direction::ALL {
                if run_length(board, (row, col), dir, color) >= RUN_TO_WIN {
                    return Some(dir);
                }
            }
        }
    }
    None
}

/// Number of quota blocks fully owned by `color`.
pub fn count_full_blocks(board: &Board, color: Color) -> usize {
    quota_blocks()
        .filter(|block| block.points().all(|(r, c)| board.get(r, c) == Some(color)))
        .count()
}

/// Test conditions 1-3 for `color` without the full-board fallback.
pub fn check_line_and_shape_wins(board: &Board, color: Color) -> Option<WinCondition> {
    if let Some(rect) = find_rectangle(board, color) {
        return Some(WinCondition::Rectangle {
            rows: rect.rows,
            cols: rect.cols,
        });
    }
    if let Some(dir) = find_five_in_row(board, color) {
        return Some(WinCondition::FiveInRow(dir));
    }
    if count_full_blocks(board, color) >= BLOCKS_TO_WIN {
        return Some(WinCondition::RegionQuota);
    }
    None
}

/// Evaluate the win conditions for the color that just moved.
///
/// When none of rectangle, five-in-a-row or region quota fire and no empty
/// cell remains, the largest-area comparison resolves the game, so a full
/// board always yields an outcome.
pub fn check_win_conditions(board: &Board, color: Color) -> Option<WinOutcome> {
    if let Some(condition) = check_line_and_shape_wins(board, color) {
        return Some(WinOutcome {
            winner: color.into(),
            condition,
            area: None,
        });
    }
    if board.is_full() {
        let area = find_largest_connected_area(board);
        debug!(
            "board full: largest white area {}, black area {}",
            area.white_cells.len(),
            area.black_cells.len()
        );
        return Some(WinOutcome {
            winner: area.winner.into(),
            condition: WinCondition::LargestArea { size: area.size },
            area: Some(area),
        });
    }
    None
}

/// Whether placing `color` at `pt` wins outright for `color`.
///
/// A full-board tiebreak counts only when it goes to `color`.
pub fn wins_immediately(board: &Board, pt: Point, color: Color) -> bool {
    check_win_conditions(&board.with_stone(pt, color), color)
        .is_some_and(|outcome| outcome.winner == Winner::from(color))
}

/// Place `color` at `(row, col)` and report the resulting outcome, if any.
///
/// Turn order and player identity are not checked here. On error the board
/// is left unchanged.
pub fn apply_move(
    board: &mut Board,
    color: Color,
    row: usize,
    col: usize,
) -> Result<Option<WinOutcome>, MoveError> {
    if !Board::in_bounds(row, col) {
        return Err(MoveError::OutOfBounds { row, col });
    }
    if board.get(row, col).is_some() {
        return Err(MoveError::Occupied { row, col });
    }
    board.set((row, col), color);
    Ok(check_win_conditions(board, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_counts() {
        assert_eq!(rectangles().count(), 40);
        assert_eq!(quota_blocks().count(), 9);
        let cells: Vec<Point> = quota_blocks().flat_map(|b| b.points().collect::<Vec<_>>()).collect();
        assert_eq!(cells.len(), N * N);
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new();
        assert_eq!(check_win_conditions(&board, Color::White), None);
        assert_eq!(check_win_conditions(&board, Color::Black), None);
    }

    #[test]
    fn test_rectangle_3x2() {
        let board = Board::from_rows(&["WW....", "WW....", "WW...."]);
        let outcome = check_win_conditions(&board, Color::White).unwrap();
        assert_eq!(outcome.winner, Winner::White);
        assert_eq!(outcome.condition, WinCondition::Rectangle { rows: 3, cols: 2 });
        assert_eq!(outcome.condition.tag(), "rectangle_3x2");
    }

    #[test]
    fn test_rectangle_2x3() {
        let board = Board::from_rows(&["", "", "", "...BBB", "...BBB"]);
        let outcome = check_win_conditions(&board, Color::Black).unwrap();
        assert_eq!(outcome.condition, WinCondition::Rectangle { rows: 2, cols: 3 });
    }

    #[test]
    fn test_rectangle_only_for_mover() {
        let board = Board::from_rows(&["WW....", "WW....", "WW...."]);
        assert_eq!(check_win_conditions(&board, Color::Black), None);
    }

    #[test]
    fn test_five_diagonal_down_right() {
        let board = Board::from_rows(&["W.....", ".W....", "..W...", "...W..", "....W."]);
        let outcome = check_win_conditions(&board, Color::White).unwrap();
        assert_eq!(outcome.condition, WinCondition::FiveInRow(Direction::DiagonalDownRight));
        assert_eq!(outcome.condition.tag(), "five_in_row_diagonal_down_right");
    }

    #[test]
    fn test_five_diagonal_down_left() {
        let board = Board::from_rows(&[".....B", "....B.", "...B..", "..B...", ".B...."]);
        assert_eq!(
            find_five_in_row(&board, Color::Black),
            Some(Direction::DiagonalDownLeft)
        );
    }

    #[test]
    fn test_five_vertical_and_horizontal() {
        let board = Board::from_rows(&[".B", ".B", ".B", ".B", ".B"]);
        assert_eq!(find_five_in_row(&board, Color::Black), Some(Direction::Vertical));
        let board = Board::from_rows(&["", ".WWWWW"]);
        assert_eq!(find_five_in_row(&board, Color::White), Some(Direction::Horizontal));
    }

    #[test]
    fn test_four_is_not_five() {
        let board = Board::from_rows(&["WWWW.W"]);
        assert_eq!(find_five_in_row(&board, Color::White), None);
        assert_eq!(check_win_conditions(&board, Color::White), None);
    }

    #[test]
    fn test_region_quota() {
        let board = Board::from_rows(&["BB..BB", "BB..BB"]);
        let outcome = check_win_conditions(&board, Color::Black).unwrap();
        assert_eq!(outcome.winner, Winner::Black);
        assert_eq!(outcome.condition, WinCondition::RegionQuota);
    }

    #[test]
    fn test_region_quota_needs_aligned_blocks() {
        // A 2x2 square straddling block borders counts for nothing.
        let board = Board::from_rows(&[".BB...", ".BB...", "", "...BB.", "...BB."]);
        assert_eq!(count_full_blocks(&board, Color::Black), 0);
        assert_eq!(check_win_conditions(&board, Color::Black), None);
    }

    #[test]
    fn test_rectangle_has_priority_over_quota() {
        let board = Board::from_rows(&["WWW.WW", "WWW.WW"]);
        let outcome = check_win_conditions(&board, Color::White).unwrap();
        assert_eq!(outcome.condition, WinCondition::Rectangle { rows: 2, cols: 3 });
    }

    #[test]
    fn test_apply_move_occupied_leaves_board_unchanged() {
        let mut board = Board::from_rows(&["B....."]);
        let before = board;
        let err = apply_move(&mut board, Color::White, 0, 0).unwrap_err();
        assert_eq!(err, MoveError::Occupied { row: 0, col: 0 });
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_move_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(
            apply_move(&mut board, Color::White, 6, 0),
            Err(MoveError::OutOfBounds { row: 6, col: 0 })
        );
    }

    #[test]
    fn test_apply_move_reports_win() {
        let mut board = Board::from_rows(&["WW....", "WW....", "W....."]);
        let outcome = apply_move(&mut board, Color::White, 2, 1).unwrap().unwrap();
        assert_eq!(outcome.winner, Winner::White);
        assert_eq!(board.get(2, 1), Some(Color::White));
    }

    #[test]
    fn test_wins_immediately() {
        let board = Board::from_rows(&["BBBB.."]);
        assert!(wins_immediately(&board, (0, 4), Color::Black));
        assert!(!wins_immediately(&board, (0, 4), Color::White));
        assert!(!wins_immediately(&board, (1, 4), Color::Black));
    }
}
