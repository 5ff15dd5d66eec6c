//! Falling-block puzzle engine: board, pieces, scoring and the tick-driven
//! session state machine. Rendering and input live in the binary.

pub mod board;
pub mod config;
pub mod game;
pub mod high_score;
pub mod piece;
pub mod scheduler;
pub mod shape;

pub use board::Board;
pub use config::{Mode, TickIntervals, GRID_HEIGHT, GRID_WIDTH};
pub use game::{Command, Direction, GameEvent, GameState, Session, Snapshot};
pub use high_score::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use piece::{ActivePiece, Position};
pub use scheduler::TickScheduler;
pub use shape::{PieceProvider, RandomPieceProvider, SequencePieceProvider, Shape, TetrominoType};

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use crate::board::Board;
    use crate::config::{GRID_HEIGHT, GRID_WIDTH};

    pub fn empty_board() -> Board {
        Board::new(GRID_WIDTH, GRID_HEIGHT)
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.width() {
            board.set(x, y, true);
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..board.width() {
            if x != gap_x {
                board.set(x, y, true);
            }
        }
    }
}
