//! Game board representation and collision detection

use crate::tetromino::{Matrix, occupied};
use ratatui::style::Color;

/// Default board dimensions
pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 10;
/// Smallest board every piece can spawn on; spawn matrices span columns
/// 0..4 from x = cols / 2 - 1
pub const MIN_ROWS: usize = 4;
pub const MIN_COLS: usize = 5;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: Vec<Vec<Cell>>,
    cols: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![Cell::Empty; cols]; rows],
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at column `x`, row `y`
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a single cell is inside the board and empty
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_empty())
    }

    /// Check whether `matrix` placed with its top-left corner at `(x, y)`
    /// stays inside the board and only covers empty cells
    pub fn is_valid_placement(&self, x: i32, y: i32, matrix: &Matrix) -> bool {
        occupied(matrix).all(|(dx, dy)| self.is_open(x + dx, y + dy))
    }

    /// Write the occupied cells of `matrix` into the grid with `color`
    pub fn merge(&mut self, x: i32, y: i32, matrix: &Matrix, color: Color) {
        for (dx, dy) in occupied(matrix) {
            self.set(x + dx, y + dy, Cell::Filled(color));
        }
    }

    /// Borrow a row, top row is 0
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.cells.get(y).map(|row| row.as_slice())
    }

    /// Iterate rows from top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    /// Indices of every full row, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.rows()).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Overwrite a row with the given cells (used by the clear animation)
    pub fn paint_row(&mut self, y: usize, cells: &[Cell]) {
        if let Some(row) = self.cells.get_mut(y) {
            if cells.len() == row.len() {
                row.copy_from_slice(cells);
            }
        }
    }

    /// Empty every cell of a row in place
    pub fn blank_row(&mut self, y: usize) {
        if let Some(row) = self.cells.get_mut(y) {
            row.fill(Cell::Empty);
        }
    }

    /// Remove the given rows and push an empty row in at the top for each.
    ///
    /// `rows` must be sorted ascending; rows below a removed row keep their
    /// index, rows above it move down by one.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        for &y in rows {
            if y >= self.cells.len() {
                continue;
            }
            self.cells.remove(y);
            self.cells.insert(0, vec![Cell::Empty; self.cols]);
        }
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    fn fill_row(board: &mut Board, y: i32, color: Color) {
        for x in 0..board.cols() as i32 {
            board.set(x, y, Cell::Filled(color));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.rows(), DEFAULT_ROWS);
        assert_eq!(board.cols(), DEFAULT_COLS);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(5, 5, Cell::Filled(Color::Red)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(Color::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(DEFAULT_COLS as i32, 0), None);
        assert_eq!(board.get(0, DEFAULT_ROWS as i32), None);
        assert!(!board.set(0, DEFAULT_ROWS as i32, Cell::Filled(Color::Red)));
        assert!(board.is_empty());
    }

    #[test]
    fn test_placement_bounds() {
        let board = Board::default();
        let i_flat = TetrominoType::I.matrix(0);
        // Occupied row of the flat I is matrix row 1
        assert!(board.is_valid_placement(0, 0, i_flat));
        assert!(board.is_valid_placement(6, 0, i_flat));
        assert!(!board.is_valid_placement(7, 0, i_flat));
        assert!(!board.is_valid_placement(-1, 0, i_flat));
        assert!(board.is_valid_placement(0, DEFAULT_ROWS as i32 - 2, i_flat));
        assert!(!board.is_valid_placement(0, DEFAULT_ROWS as i32 - 1, i_flat));
        // Empty matrix rows may hang above the top
        assert!(board.is_valid_placement(0, -1, i_flat));
        assert!(!board.is_valid_placement(0, -2, i_flat));
    }

    #[test]
    fn test_placement_collision() {
        let mut board = Board::default();
        let o = TetrominoType::O.matrix(0);
        assert!(board.is_valid_placement(3, 3, o));
        board.set(4, 4, Cell::Filled(Color::Red));
        assert!(!board.is_valid_placement(3, 3, o));
        // Overlap only on the matrix's empty cells is fine
        assert!(board.is_valid_placement(3, 1, o));
        assert!(board.is_valid_placement(4, 4, &[[false; 4]; 4]));
    }

    #[test]
    fn test_merge() {
        let mut board = Board::default();
        board.merge(0, 0, TetrominoType::O.matrix(0), Color::Yellow);
        assert_eq!(board.filled_count(), 4);
        assert_eq!(board.get(1, 1), Some(Cell::Filled(Color::Yellow)));
        assert_eq!(board.get(2, 2), Some(Cell::Filled(Color::Yellow)));
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_full_row_detection() {
        let mut board = Board::default();
        let bottom = DEFAULT_ROWS - 1;
        for x in 0..DEFAULT_COLS as i32 - 1 {
            board.set(x, bottom as i32, Cell::Filled(Color::Blue));
        }
        assert!(!board.is_row_full(bottom));
        assert!(board.full_rows().is_empty());

        board.set(DEFAULT_COLS as i32 - 1, bottom as i32, Cell::Filled(Color::Red));
        assert!(board.is_row_full(bottom));
        assert_eq!(board.full_rows(), vec![bottom]);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        let bottom = DEFAULT_ROWS as i32 - 1;
        fill_row(&mut board, bottom, Color::Cyan);
        board.set(0, bottom - 1, Cell::Filled(Color::Red));
        board.set(3, 0, Cell::Filled(Color::Green));

        let full = board.full_rows();
        board.remove_rows(&full);

        assert_eq!(board.rows(), DEFAULT_ROWS);
        assert_eq!(board.get(0, bottom), Some(Cell::Filled(Color::Red)));
        assert_eq!(board.get(0, bottom - 1), Some(Cell::Empty));
        assert_eq!(board.get(3, 1), Some(Cell::Filled(Color::Green)));
        assert!(board.row(0).unwrap().iter().all(|c| c.is_empty()));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_clear_non_adjacent_lines_preserves_order() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Color::Cyan);
        fill_row(&mut board, 17, Color::Cyan);
        board.set(1, 18, Cell::Filled(Color::Red));
        board.set(2, 16, Cell::Filled(Color::Blue));
        board.set(3, 15, Cell::Filled(Color::Green));

        let full = board.full_rows();
        assert_eq!(full, vec![17, 19]);
        board.remove_rows(&full);

        assert_eq!(board.rows(), DEFAULT_ROWS);
        assert_eq!(board.get(1, 19), Some(Cell::Filled(Color::Red)));
        assert_eq!(board.get(2, 18), Some(Cell::Filled(Color::Blue)));
        assert_eq!(board.get(3, 17), Some(Cell::Filled(Color::Green)));
        assert_eq!(board.filled_count(), 3);
    }

    #[test]
    fn test_paint_and_blank_row() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Color::Cyan);
        let saved = board.row(19).unwrap().to_vec();
        board.blank_row(19);
        assert!(board.is_empty());
        board.paint_row(19, &saved);
        assert!(board.is_row_full(19));
    }
}
