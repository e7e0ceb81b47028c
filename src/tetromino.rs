//! Tetromino definitions and shapes
//!
//! All 7 pieces with their rotation states as 4x4 occupancy matrices.
//! Rotation states are listed in the order `rotate` cycles through them.

use ratatui::style::Color;

/// Side length of a rotation matrix
pub const MATRIX_SIZE: usize = 4;

/// A single rotation state, row-major, `true` marks an occupied cell
pub type Matrix = [[bool; MATRIX_SIZE]; MATRIX_SIZE];

/// Number of piece kinds in the catalog
pub const SHAPE_COUNT: usize = 7;

const X: bool = true;
const O: bool = false;

const I_STATES: [Matrix; 2] = [
    [[O, O, O, O], [X, X, X, X], [O, O, O, O], [O, O, O, O]],
    [[O, X, O, O], [O, X, O, O], [O, X, O, O], [O, X, O, O]],
];

const J_STATES: [Matrix; 4] = [
    [[O, O, O, O], [X, X, X, O], [O, O, X, O], [O, O, O, O]],
    [[O, X, O, O], [O, X, O, O], [X, X, O, O], [O, O, O, O]],
    [[X, O, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
    [[O, X, X, O], [O, X, O, O], [O, X, O, O], [O, O, O, O]],
];

const L_STATES: [Matrix; 4] = [
    [[O, O, O, O], [O, O, X, O], [X, X, X, O], [O, O, O, O]],
    [[O, X, O, O], [O, X, O, O], [O, X, X, O], [O, O, O, O]],
    [[O, O, O, O], [X, X, X, O], [X, O, O, O], [O, O, O, O]],
    [[X, X, O, O], [O, X, O, O], [O, X, O, O], [O, O, O, O]],
];

const O_STATES: [Matrix; 1] = [[[O, O, O, O], [O, X, X, O], [O, X, X, O], [O, O, O, O]]];

const S_STATES: [Matrix; 2] = [
    [[O, O, O, O], [O, X, X, O], [X, X, O, O], [O, O, O, O]],
    [[O, X, O, O], [O, X, X, O], [O, O, X, O], [O, O, O, O]],
];

const T_STATES: [Matrix; 4] = [
    [[O, O, O, O], [X, X, X, O], [O, X, O, O], [O, O, O, O]],
    [[O, X, O, O], [X, X, O, O], [O, X, O, O], [O, O, O, O]],
    [[O, O, O, O], [O, X, O, O], [X, X, X, O], [O, O, O, O]],
    [[O, X, O, O], [O, X, X, O], [O, X, O, O], [O, O, O, O]],
];

const Z_STATES: [Matrix; 2] = [
    [[O, O, O, O], [X, X, O, O], [O, X, X, O], [O, O, O, O]],
    [[O, X, O, O], [X, X, O, O], [X, O, O, O], [O, O, O, O]],
];

/// The 7 tetromino types, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Lime
    T, // Purple
    Z, // Red
}

impl TetrominoType {
    /// Get all tetromino types in catalog order
    pub fn all() -> [TetrominoType; SHAPE_COUNT] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Look up a type by catalog index
    pub fn from_index(index: usize) -> Option<TetrominoType> {
        Self::all().get(index).copied()
    }

    /// Position of this type in the catalog
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the display color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Rgb(0, 255, 0), // Lime
            TetrominoType::T => Color::Rgb(128, 0, 128), // Purple
            TetrominoType::Z => Color::Red,
        }
    }

    /// Rotation states in cycling order
    pub fn rotations(&self) -> &'static [Matrix] {
        match self {
            TetrominoType::I => &I_STATES,
            TetrominoType::J => &J_STATES,
            TetrominoType::L => &L_STATES,
            TetrominoType::O => &O_STATES,
            TetrominoType::S => &S_STATES,
            TetrominoType::T => &T_STATES,
            TetrominoType::Z => &Z_STATES,
        }
    }

    /// Matrix for a rotation index, wrapping modulo the state count
    pub fn matrix(&self, rotation: usize) -> &'static Matrix {
        let states = self.rotations();
        &states[rotation % states.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }
}

/// Number of shapes in the catalog
pub fn shape_count() -> usize {
    SHAPE_COUNT
}

/// Rotation states of the shape at `index`
///
/// Returns an empty slice for an index outside the catalog.
pub fn rotations_of(index: usize) -> &'static [Matrix] {
    match TetrominoType::from_index(index) {
        Some(kind) => kind.rotations(),
        None => &[],
    }
}

/// Display color of the shape at `index`
pub fn color_of(index: usize) -> Option<Color> {
    TetrominoType::from_index(index).map(|t| t.color())
}

/// Iterate the occupied `(x, y)` offsets of a matrix
pub fn occupied(matrix: &Matrix) -> impl Iterator<Item = (i32, i32)> + '_ {
    matrix.iter().enumerate().flat_map(|(y, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(x, _)| (x as i32, y as i32))
    })
}
