use crate::board::Board;
use crate::shape::Shape;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Row the top of a freshly spawned piece starts on, one above the visible grid.
pub const SPAWN_ROW: i16 = -1;

/// The falling piece: a shape anchored by its top-left bounding-box corner.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    pub shape: Shape,
    pub position: Position,
}

impl ActivePiece {
    pub fn new_at(shape: Shape, x: i16, y: i16) -> Self {
        Self {
            shape,
            position: Position { x, y },
        }
    }

    pub fn spawn_position(shape: &Shape, board: &Board) -> Position {
        Position {
            x: (board.width() / 2) as i16 - (shape.cols() / 2) as i16,
            y: SPAWN_ROW,
        }
    }

    /// Centers `shape` above the board. The flag is false when the spawn
    /// position already collides.
    pub fn spawn(shape: Shape, board: &Board) -> (Self, bool) {
        let position = Self::spawn_position(&shape, board);
        let ok = board.can_place(&shape, position);
        (Self { shape, position }, ok)
    }

    pub fn try_move(&mut self, board: &Board, dx: i16, dy: i16) -> bool {
        let candidate = Position {
            x: self.position.x + dx,
            y: self.position.y + dy,
        };
        if board.can_place(&self.shape, candidate) {
            self.position = candidate;
            true
        } else {
            false
        }
    }

    /// Quarter turn clockwise in place. No kick offsets are tried.
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated();
        if board.can_place(&rotated, self.position) {
            self.shape = rotated;
            true
        } else {
            false
        }
    }

    /// Whether the whole bounding box ends at or above the floor.
    pub fn fits_vertically(&self, height: usize) -> bool {
        self.position.y + self.shape.rows() as i16 <= height as i16
    }

    pub fn blocks(&self) -> Vec<Position> {
        self.shape
            .cells()
            .map(|(dx, dy)| Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            })
            .collect()
    }
}
