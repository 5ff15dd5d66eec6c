//! Board and shape geometry tests
//!
//! Test categories:
//! - Placement checks against walls, floor and filled cells
//! - Committing pieces
//! - Row clearing
//! - Shape rotation and the random catalog

use blockfall::shape::random_shape;
use blockfall::{
    test_helpers::*, Board, PieceProvider, Position, RandomPieceProvider, SequencePieceProvider,
    TetrominoType, GRID_HEIGHT, GRID_WIDTH,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Placement Tests
// ============================================================================

mod placement {
    use super::*;

    #[test]
    fn cells_above_the_grid_do_not_collide() {
        let board = empty_board();
        let t = TetrominoType::T.shape();

        assert!(board.can_place(&t, Position::new(4, -1)));
        assert!(board.can_place(&t, Position::new(4, -2)));
        assert!(board.can_place(&TetrominoType::I.shape().rotated(), Position::new(0, -3)));
    }

    #[test]
    fn side_walls_block() {
        let board = empty_board();
        let t = TetrominoType::T.shape();

        assert!(board.can_place(&t, Position::new(0, 5)));
        assert!(!board.can_place(&t, Position::new(-1, 5)));
        assert!(board.can_place(&t, Position::new(GRID_WIDTH as i16 - 3, 5)));
        assert!(!board.can_place(&t, Position::new(GRID_WIDTH as i16 - 2, 5)));
    }

    #[test]
    fn side_walls_block_above_the_grid_too() {
        let board = empty_board();

        assert!(!board.can_place(&TetrominoType::O.shape(), Position::new(-1, -1)));
    }

    #[test]
    fn floor_blocks() {
        let board = empty_board();
        let t = TetrominoType::T.shape();

        assert!(board.can_place(&t, Position::new(4, GRID_HEIGHT as i16 - 2)));
        assert!(!board.can_place(&t, Position::new(4, GRID_HEIGHT as i16 - 1)));
    }

    #[test]
    fn empty_bounding_box_cells_ignore_collisions() {
        let mut board = empty_board();
        // T's lower corners are empty
        board.set(4, 6, true);
        board.set(6, 6, true);

        assert!(board.can_place(&TetrominoType::T.shape(), Position::new(4, 5)));

        board.set(5, 6, true);
        assert!(!board.can_place(&TetrominoType::T.shape(), Position::new(4, 5)));
    }

    #[test]
    fn pieces_fit_at_every_corner() {
        let board = empty_board();
        let o = TetrominoType::O.shape();
        let corners = [
            (0, 0),
            (GRID_WIDTH as i16 - 2, 0),
            (0, GRID_HEIGHT as i16 - 2),
            (GRID_WIDTH as i16 - 2, GRID_HEIGHT as i16 - 2),
        ];

        for (x, y) in corners {
            assert!(
                board.can_place(&o, Position::new(x, y)),
                "O at ({}, {}) should fit",
                x,
                y
            );
        }
    }
}

// ============================================================================
// Commit Tests
// ============================================================================

mod commit {
    use super::*;

    #[test]
    fn commit_fills_footprint() {
        let mut board = empty_board();

        board.commit(&TetrominoType::S.shape(), Position::new(2, 10));

        assert!(board.is_filled(3, 10));
        assert!(board.is_filled(4, 10));
        assert!(board.is_filled(2, 11));
        assert!(board.is_filled(3, 11));
        assert_eq!(board.total_filled_cells(), 4);
    }

    #[test]
    fn commit_drops_cells_above_the_grid() {
        let mut board = empty_board();

        board.commit(&TetrominoType::I.shape().rotated(), Position::new(7, -2));

        assert!(board.is_filled(7, 0));
        assert!(board.is_filled(7, 1));
        assert_eq!(board.total_filled_cells(), 2);
        assert_eq!(board.height(), GRID_HEIGHT);
    }
}

// ============================================================================
// Line Clearing Tests
// ============================================================================

mod line_clearing {
    use super::*;

    #[test]
    fn single_complete_row_is_cleared() {
        let mut board = empty_board();
        fill_row(&mut board, GRID_HEIGHT - 1);
        assert!(board.is_row_complete(GRID_HEIGHT - 1));

        let cleared = board.clear_full_rows();

        assert_eq!(cleared, 1);
        assert_eq!(board.filled_count_in_row(GRID_HEIGHT - 1), 0);
    }

    #[test]
    fn no_full_rows_leaves_board_unchanged() {
        let mut board = empty_board();
        fill_row_with_gap(&mut board, GRID_HEIGHT - 1, 5);
        fill_row_with_gap(&mut board, GRID_HEIGHT - 2, 0);
        board.set(3, 4, true);
        let before = board.clone();

        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn rows_above_cleared_line_fall_down() {
        let mut board = empty_board();
        fill_row(&mut board, GRID_HEIGHT - 1);
        board.set(0, GRID_HEIGHT - 2, true);
        board.set(1, GRID_HEIGHT - 2, true);

        board.clear_full_rows();

        assert!(board.is_filled(0, GRID_HEIGHT - 1));
        assert!(board.is_filled(1, GRID_HEIGHT - 1));
        assert_eq!(board.total_filled_cells(), 2);
    }

    #[test]
    fn adjacent_full_rows_clear_in_one_pass() {
        let mut board = empty_board();
        fill_row(&mut board, GRID_HEIGHT - 1);
        fill_row(&mut board, GRID_HEIGHT - 2);
        fill_row_with_gap(&mut board, GRID_HEIGHT - 3, 7);

        let cleared = board.clear_full_rows();

        assert_eq!(cleared, 2);
        assert_eq!(board.filled_count_in_row(GRID_HEIGHT - 1), GRID_WIDTH - 1);
        assert!(!board.is_filled(7, GRID_HEIGHT - 1));
        assert_eq!(board.filled_count_in_row(GRID_HEIGHT - 2), 0);
    }

    #[test]
    fn non_contiguous_rows_cleared() {
        let mut board = empty_board();
        fill_row(&mut board, GRID_HEIGHT - 1);
        board.set(2, GRID_HEIGHT - 2, true);
        fill_row(&mut board, GRID_HEIGHT - 3);

        let cleared = board.clear_full_rows();

        assert_eq!(cleared, 2);
        assert!(board.is_filled(2, GRID_HEIGHT - 1));
        assert_eq!(board.total_filled_cells(), 1);
    }

    #[test]
    fn clearing_preserves_dimensions() {
        let mut board = empty_board();
        for y in (GRID_HEIGHT - 4)..GRID_HEIGHT {
            fill_row(&mut board, y);
        }
        board.commit(&TetrominoType::J.shape(), Position::new(0, 10));

        assert_eq!(board.clear_full_rows(), 4);

        assert_eq!(board.rows().len(), GRID_HEIGHT);
        assert!(board.rows().iter().all(|row| row.len() == GRID_WIDTH));
        assert_eq!(board.total_filled_cells(), 4);
    }

    #[test]
    fn all_rows_filled_and_cleared() {
        let mut board = empty_board();
        for y in 0..GRID_HEIGHT {
            fill_row(&mut board, y);
        }

        assert_eq!(board.clear_full_rows(), GRID_HEIGHT as u32);
        assert_eq!(board.total_filled_cells(), 0);
        assert_eq!(board.rows().len(), GRID_HEIGHT);
    }

    #[test]
    fn custom_sized_board() {
        let mut board = Board::from_rows(vec![
            vec![false, false, false],
            vec![true, true, true],
            vec![true, false, true],
        ]);

        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 3);
        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(
            board.rows(),
            &[
                vec![false, false, false],
                vec![false, false, false],
                vec![true, false, true],
            ]
        );
    }
}

// ============================================================================
// Shape Tests
// ============================================================================

mod shapes {
    use super::*;

    #[test]
    fn every_tetromino_has_four_cells() {
        for kind in TetrominoType::ALL {
            assert_eq!(kind.shape().cells().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn t_rotates_clockwise() {
        let rotated = TetrominoType::T.shape().rotated();

        // .#
        // ##
        // .#
        assert_eq!(rotated.rows(), 3);
        assert_eq!(rotated.cols(), 2);
        let cells: Vec<(i16, i16)> = rotated.cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn four_rotations_return_the_original() {
        for kind in TetrominoType::ALL {
            let shape = kind.shape();
            let turned = shape.rotated().rotated().rotated().rotated();
            assert_eq!(turned, shape, "{:?}", kind);
        }
    }

    #[test]
    fn non_square_shapes_change_on_a_single_turn() {
        for kind in TetrominoType::ALL {
            if kind == TetrominoType::O {
                continue;
            }
            assert_ne!(kind.shape().rotated(), kind.shape(), "{:?}", kind);
        }
    }

    #[test]
    fn o_is_rotation_invariant() {
        let o = TetrominoType::O.shape();
        let mut turned = o.clone();
        for _ in 0..7 {
            turned = turned.rotated();
            assert_eq!(turned, o);
        }
    }
}

// ============================================================================
// Catalog Tests
// ============================================================================

mod catalog {
    use super::*;

    #[test]
    fn random_shape_covers_all_seven() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = Vec::new();

        for _ in 0..500 {
            let kind = random_shape(&mut rng).kind();
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }

        assert_eq!(seen.len(), TetrominoType::ALL.len());
    }

    #[test]
    fn seeded_providers_repeat() {
        let mut a = RandomPieceProvider::seeded(42);
        let mut b = RandomPieceProvider::seeded(42);

        for _ in 0..50 {
            assert_eq!(a.next_shape(), b.next_shape());
        }
    }

    #[test]
    fn sequence_provider_cycles() {
        let mut provider =
            SequencePieceProvider::new(vec![TetrominoType::I, TetrominoType::O]);

        assert_eq!(provider.next_shape().kind(), TetrominoType::I);
        assert_eq!(provider.next_shape().kind(), TetrominoType::O);
        assert_eq!(provider.next_shape().kind(), TetrominoType::I);
    }
}

// ============================================================================
// Dimension Tests
// ============================================================================

mod dimensions {
    use super::*;
    use blockfall::board::MAX_DIMENSION;
    use blockfall::{MemoryHighScoreStore, Mode, Session};

    #[test]
    #[should_panic(expected = "must not exceed")]
    fn height_beyond_coordinate_range_is_rejected() {
        Board::new(GRID_WIDTH, 40_000);
    }

    #[test]
    #[should_panic(expected = "must not exceed")]
    fn width_beyond_coordinate_range_is_rejected() {
        Board::new(MAX_DIMENSION + 1, GRID_HEIGHT);
    }

    #[test]
    fn tallest_board_still_places_at_spawn() {
        let board = Board::new(GRID_WIDTH, MAX_DIMENSION);
        let t = TetrominoType::T.shape();

        assert!(board.can_place(&t, Position::new(4, -1)));
        assert!(board.can_place(&t, Position::new(4, MAX_DIMENSION as i16 - 2)));
        assert!(!board.can_place(&t, Position::new(4, MAX_DIMENSION as i16 - 1)));
    }

    #[test]
    fn session_on_tallest_board_starts_running() {
        let session = Session::with_board(
            Board::new(GRID_WIDTH, MAX_DIMENSION),
            Mode::Medium,
            Box::new(SequencePieceProvider::new(vec![TetrominoType::T])),
            Box::new(MemoryHighScoreStore::new()),
        );

        assert!(!session.is_game_over());
        assert_eq!(session.active.position, Position::new(4, -1));
    }
}
