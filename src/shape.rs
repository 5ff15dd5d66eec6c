use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Tetromino Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TetrominoType {
    T,
    I,
    O,
    Z,
    S,
    L,
    J,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::T,
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::Z,
        TetrominoType::S,
        TetrominoType::L,
        TetrominoType::J,
    ];

    /// Spawn orientation, one slice per row of the bounding box.
    fn matrix(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::T => &[&[1, 1, 1], &[0, 1, 0]],
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::L => &[&[1, 1, 1], &[1, 0, 0]],
            TetrominoType::J => &[&[1, 1, 1], &[0, 0, 1]],
        }
    }

    pub fn shape(&self) -> Shape {
        let matrix = self.matrix();
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, |row| row.len());
        let cells = matrix
            .iter()
            .flat_map(|row| row.iter().map(|&cell| cell != 0))
            .collect();
        Shape {
            kind: *self,
            rows,
            cols,
            cells,
        }
    }
}

/// Draws one of the seven tetrominoes uniformly at random.
pub fn random_shape<R: Rng>(rng: &mut R) -> Shape {
    TetrominoType::ALL[rng.gen_range(0..TetrominoType::ALL.len())].shape()
}

// ============================================================================
// Shape
// ============================================================================

/// Immutable occupancy matrix of a piece's bounding box.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Shape {
    kind: TetrominoType,
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Shape {
    pub fn kind(&self) -> TetrominoType {
        self.kind
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Offsets `(dx, dy)` of every occupied cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(i, _)| ((i % self.cols) as i16, (i / self.cols) as i16))
    }

    /// Quarter turn clockwise: transpose of the row-reversed matrix.
    pub fn rotated(&self) -> Shape {
        let rows = self.cols;
        let cols = self.rows;
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..rows {
            for c in 0..cols {
                cells.push(self.is_filled(self.rows - 1 - c, r));
            }
        }
        Shape {
            kind: self.kind,
            rows,
            cols,
            cells,
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_shape(&mut self) -> Shape;
}

/// Uniform random selection backed by a seedable generator.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> Shape {
        random_shape(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_shape(&mut self) -> Shape {
        if self.pieces.is_empty() {
            return TetrominoType::O.shape();
        }
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece.shape()
    }
}
