use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::piece::Position;
use crate::shape::Shape;

/// Largest width or height a board accepts; piece coordinates are `i16`.
pub const MAX_DIMENSION: usize = i16::MAX as usize;

/// Fixed-size occupancy grid. Row 0 is the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<bool>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// Panics if either dimension is zero or larger than [`MAX_DIMENSION`].
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        assert!(
            width <= MAX_DIMENSION && height <= MAX_DIMENSION,
            "board dimensions must not exceed {MAX_DIMENSION}"
        );
        Self {
            width,
            height,
            rows: vec![vec![false; width]; height],
        }
    }

    /// Builds a board from explicit rows. Short rows are padded with empty
    /// cells and long rows truncated to the width of the first row.
    ///
    /// Panics under the same conditions as [`Board::new`], including when
    /// `rows` is empty or its first row is.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        let width = rows.first().map_or(0, |row| row.len());
        let mut board = Self::new(width, rows.len());
        for (y, row) in rows.into_iter().enumerate() {
            for (x, cell) in row.into_iter().take(width).enumerate() {
                board.rows[y][x] = cell;
            }
        }
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Out-of-range coordinates read as empty.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, x: usize, y: usize, filled: bool) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = filled;
        }
    }

    pub fn clear(&mut self) {
        self.rows = vec![vec![false; self.width]; self.height];
    }

    /// True when every occupied cell of `shape` at `origin` is inside the side
    /// walls, above the floor and not on a filled cell. Cells above row 0 never
    /// collide.
    pub fn can_place(&self, shape: &Shape, origin: Position) -> bool {
        for (dx, dy) in shape.cells() {
            let x = origin.x + dx;
            let y = origin.y + dy;
            if y >= self.height as i16 {
                return false;
            }
            if x < 0 || x >= self.width as i16 {
                return false;
            }
            if y >= 0 && self.rows[y as usize][x as usize] {
                return false;
            }
        }
        true
    }

    /// Writes the shape's visible cells into the grid without a collision check.
    pub fn commit(&mut self, shape: &Shape, origin: Position) {
        for (dx, dy) in shape.cells() {
            let x = origin.x + dx;
            let y = origin.y + dy;
            if y < 0 || x < 0 {
                continue;
            }
            self.set(x as usize, y as usize, true);
        }
    }

    /// Removes every full row, inserting an empty row at the top for each,
    /// and returns how many were removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared_count = 0;
        let mut y = self.height;

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.rows.remove(y - 1);
                self.rows.insert(0, vec![false; self.width]);
                cleared_count += 1;
                // Re-examine the same index: the row above has shifted into it
            } else {
                y -= 1;
            }
        }

        cleared_count
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows.get(y).is_some_and(|row| row.iter().all(|cell| *cell))
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| row.iter().filter(|cell| **cell).count())
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| **cell).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}
