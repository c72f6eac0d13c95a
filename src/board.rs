//! The 6x6 grid and connected-region analysis.
//!
//! Cells are `Option<Color>`; a placed stone is never removed. Regions are
//! 4-connected (up/down/left/right) and are recomputed on every query with an
//! explicit-stack flood fill.

use std::fmt;

use crate::constants::{CELLS, N};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell position as `(row, col)`, both 0-indexed.
pub type Point = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Color>; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// Build a board from text rows of `W`, `B` and `.`.
    ///
    /// Rows shorter than `N` are padded with empty cells; extra rows and
    /// unknown characters are ignored.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Board::new();
        for (row, line) in rows.iter().take(N).enumerate() {
            let cells = line.chars().filter(|c| !c.is_whitespace());
            for (col, ch) in cells.take(N).enumerate() {
                board.cells[row][col] = match ch {
                    'W' | 'w' => Some(Color::White),
                    'B' | 'b' => Some(Color::Black),
                    _ => None,
                };
            }
        }
        board
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < N && col < N
    }

    /// Cell content; out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if !Self::in_bounds(row, col) {
            return None;
        }
        self.cells[row][col]
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        Self::in_bounds(row, col) && self.cells[row][col].is_none()
    }

    /// Place a stone without any rule checks.
    ///
    /// Callers go through [`crate::rules::apply_move`] for legal play; the
    /// search uses this on its private clones after filtering empty cells.
    pub(crate) fn set(&mut self, (row, col): Point, color: Color) {
        self.cells[row][col] = Some(color);
    }

    /// Return a copy of the board with `color` placed at `pt`.
    pub fn with_stone(&self, pt: Point, color: Color) -> Board {
        let mut next = *self;
        next.set(pt, color);
        next
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.is_some())
    }

    /// All empty cells in row-major order.
    pub fn empty_points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(CELLS);
        for row in 0..N {
            for col in 0..N {
                if self.cells[row][col].is_none() {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == Some(color))
            .count()
    }

    fn neighbors(row: usize, col: usize) -> impl Iterator<Item = Point> {
        let mut v = Vec::with_capacity(4);
        if row > 0 {
            v.push((row - 1, col));
        }
        if row + 1 < N {
            v.push((row + 1, col));
        }
        if col > 0 {
            v.push((row, col - 1));
        }
        if col + 1 < N {
            v.push((row, col + 1));
        }
        v.into_iter()
    }

    /// Flood-fill the region containing `start`, marking `visited`.
    ///
    /// Returns the cells of the region, or an empty vector when `start` is
    /// empty or already visited.
    fn collect_region(&self, start: Point, visited: &mut [[bool; N]; N]) -> Vec<Point> {
        let Some(color) = self.get(start.0, start.1) else {
            return Vec::new();
        };
        let mut stack = vec![start];
        let mut out = Vec::new();
        while let Some((r, c)) = stack.pop() {
            if visited[r][c] || self.cells[r][c] != Some(color) {
                continue;
            }
            visited[r][c] = true;
            out.push((r, c));
            for (nr, nc) in Self::neighbors(r, c) {
                if !visited[nr][nc] && self.cells[nr][nc] == Some(color) {
                    stack.push((nr, nc));
                }
            }
        }
        out
    }

    /// Every 4-connected region of `color`, in row-major order of their first cell.
    pub fn regions(&self, color: Color) -> Vec<Vec<Point>> {
        let mut visited = [[false; N]; N];
        let mut out = Vec::new();
        for row in 0..N {
            for col in 0..N {
                if !visited[row][col] && self.cells[row][col] == Some(color) {
                    out.push(self.collect_region((row, col), &mut visited));
                }
            }
        }
        out
    }

    /// Largest region of `color` (the first one found on ties).
    pub fn largest_region(&self, color: Color) -> Vec<Point> {
        let mut best: Vec<Point> = Vec::new();
        for region in self.regions(color) {
            if region.len() > best.len() {
                best = region;
            }
        }
        best
    }
}

/// Outcome of comparing each color's largest connected region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaResult {
    /// `None` when both largest regions have the same size.
    pub winner: Option<Color>,
    /// Size of the winning region, or the shared size on a tie.
    pub size: usize,
    pub white_cells: Vec<Point>,
    pub black_cells: Vec<Point>,
}

impl AreaResult {
    pub fn cells(&self, color: Color) -> &[Point] {
        match color {
            Color::White => &self.white_cells,
            Color::Black => &self.black_cells,
        }
    }
}

/// Compare the largest 4-connected region of each color.
///
/// The strictly larger region wins; equal sizes (including both zero) are a draw.
pub fn find_largest_connected_area(board: &Board) -> AreaResult {
    let white_cells = board.largest_region(Color::White);
    let black_cells = board.largest_region(Color::Black);
    let (white, black) = (white_cells.len(), black_cells.len());
    let (winner, size) = if white > black {
        (Some(Color::White), white)
    } else if black > white {
        (Some(Color::Black), black)
    } else {
        (None, white)
    };
    AreaResult {
        winner,
        size,
        white_cells,
        black_cells,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..N {
            write!(f, "{col} ")?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{row} ")?;
            for col in 0..N {
                let ch = match self.cells[row][col] {
                    Some(Color::White) => 'W',
                    Some(Color::Black) => 'B',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
