//! Active falling piece logic

use crate::board::Board;
use crate::tetromino::{Matrix, TetrominoType, occupied};
use ratatui::style::Color;

/// Grid position of a rotation matrix's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Top-center spawn position for a board `cols` wide
pub fn spawn_position(cols: usize) -> Position {
    Position::new((cols / 2) as i32 - 1, 0)
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Index into the type's rotation states
    pub rotation: usize,
    pub position: Position,
}

impl Piece {
    /// Create a new piece at the spawn position of a board `cols` wide
    pub fn new(piece_type: TetrominoType, cols: usize) -> Self {
        Self {
            piece_type,
            rotation: 0,
            position: spawn_position(cols),
        }
    }

    pub fn color(&self) -> Color {
        self.piece_type.color()
    }

    /// Current rotation matrix
    pub fn matrix(&self) -> &'static Matrix {
        self.piece_type.matrix(self.rotation)
    }

    /// Absolute `(x, y)` of every occupied cell
    pub fn cells(&self) -> Vec<(i32, i32)> {
        self.cells_at(self.position)
    }

    /// Absolute cells the piece would occupy at `position`
    pub fn cells_at(&self, position: Position) -> Vec<(i32, i32)> {
        occupied(self.matrix())
            .map(|(dx, dy)| (position.x + dx, position.y + dy))
            .collect()
    }

    /// Translate without any bounds check; callers validate first
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    /// Check the current rotation at `position` against the board
    pub fn fits_at(&self, board: &Board, position: Position) -> bool {
        board.is_valid_placement(position.x, position.y, self.matrix())
    }

    pub fn fits(&self, board: &Board) -> bool {
        self.fits_at(board, self.position)
    }

    /// Advance one rotation state, rolling back if the new state collides
    /// at the current position. Returns true if the rotation stuck.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let count = self.piece_type.rotations().len();
        let previous = self.rotation;
        self.rotation = (self.rotation + 1) % count;
        if self.fits(board) {
            true
        } else {
            self.rotation = previous;
            false
        }
    }

    /// Lowest `y` the piece can reach by falling straight down from its
    /// current position
    pub fn ghost_position(&self, board: &Board) -> Position {
        let mut ghost = self.position;
        while self.fits_at(board, ghost.offset(0, 1)) {
            ghost.y += 1;
        }
        ghost
    }
}
