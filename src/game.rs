use crate::board::Board;
use crate::config::Mode;
use crate::high_score::{load_high_score, HighScoreStore};
use crate::piece::{ActivePiece, Position};
use crate::shape::{PieceProvider, RandomPieceProvider, Shape};

// ============================================================================
// Configuration
// ============================================================================

// Scoring
pub const SCORE_SINGLE: u32 = 5;
pub const SCORE_PER_COMBO_ROW: u32 = 10;
pub const COMBO_MIN_ROWS: u32 = 2;

// Cosmetic countdowns (in ticks)
pub const COMBO_EFFECT_TICKS: u32 = 30;
pub const CELEBRATION_TICKS: u32 = 20;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    fn offset(&self) -> (i16, i16) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Player intents accepted by [`Session::apply`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    TogglePause,
    Restart,
    SelectMode(Mode),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    Combo(u32),
    PieceSpawned,
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
    NewHighScore { score: u32, previous: u32 },
}

/// Points awarded for clearing `lines` rows with one lock.
pub fn score_for(lines: u32) -> u32 {
    match lines {
        0 => 0,
        1 => SCORE_SINGLE,
        n => n * SCORE_PER_COMBO_ROW,
    }
}

/// Owned, read-only view of everything a renderer needs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub board: Board,
    pub active: ActivePiece,
    pub next_shape: Shape,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub mode: Mode,
    pub state: GameState,
    pub combo_ticks: u32,
    pub celebration_ticks: u32,
}

impl Snapshot {
    /// Same overlay as [`Session::render_grid`].
    pub fn render_grid(&self) -> Vec<Vec<bool>> {
        overlay(&self.board, &self.active)
    }

    pub fn is_new_high_score(&self) -> bool {
        self.state != GameState::GameOver && self.score > self.high_score
    }
}

fn overlay(board: &Board, active: &ActivePiece) -> Vec<Vec<bool>> {
    let mut visual_grid = board.rows().to_vec();

    for Position { x, y } in active.blocks() {
        if y >= 0 && x >= 0 && (y as usize) < board.height() && (x as usize) < board.width() {
            visual_grid[y as usize][x as usize] = true;
        }
    }

    visual_grid
}

// ============================================================================
// Session
// ============================================================================

pub struct Session {
    pub board: Board,
    pub active: ActivePiece,
    pub next_shape: Shape,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub mode: Mode,
    pub state: GameState,
    pub combo_ticks: u32,
    pub celebration_ticks: u32,
    pending_mode: Option<Mode>,
    piece_provider: Box<dyn PieceProvider>,
    store: Box<dyn HighScoreStore>,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(mode: Mode, store: Box<dyn HighScoreStore>) -> Self {
        Self::with_provider(mode, Box::new(RandomPieceProvider::new()), store)
    }

    pub fn with_provider(
        mode: Mode,
        provider: Box<dyn PieceProvider>,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        Self::with_board(Board::default(), mode, provider, store)
    }

    /// Starts a session on a prepared board, spawning from the provider.
    pub fn with_board(
        board: Board,
        mode: Mode,
        mut provider: Box<dyn PieceProvider>,
        mut store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = load_high_score(store.as_mut());
        let first = provider.next_shape();
        let next_shape = provider.next_shape();
        let (active, ok) = ActivePiece::spawn(first, &board);

        let mut session = Self {
            board,
            active,
            next_shape,
            score: 0,
            high_score,
            lines_cleared: 0,
            mode,
            state: GameState::Running,
            combo_ticks: 0,
            celebration_ticks: 0,
            pending_mode: None,
            piece_provider: provider,
            store,
            events: Vec::new(),
        };
        if !ok {
            session.game_over();
        }
        session
    }

    /// Starts a session with an explicit active piece, bypassing spawn.
    pub fn with_piece(
        board: Board,
        active: ActivePiece,
        mut provider: Box<dyn PieceProvider>,
        mut store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = load_high_score(store.as_mut());
        let next_shape = provider.next_shape();

        Self {
            board,
            active,
            next_shape,
            score: 0,
            high_score,
            lines_cleared: 0,
            mode: Mode::default(),
            state: GameState::Running,
            combo_ticks: 0,
            celebration_ticks: 0,
            pending_mode: None,
            piece_provider: provider,
            store,
            events: Vec::new(),
        }
    }

    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_piece(Direction::Left),
            Command::MoveRight => self.move_piece(Direction::Right),
            Command::SoftDrop => self.move_piece(Direction::Down),
            Command::Rotate => self.rotate_piece(),
            Command::TogglePause => {
                self.toggle_pause();
                true
            }
            Command::Restart => {
                self.restart();
                true
            }
            Command::SelectMode(mode) => {
                self.select_mode(mode);
                true
            }
        }
    }

    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let (dx, dy) = direction.offset();
        if self.active.try_move(&self.board, dx, dy) {
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    pub fn rotate_piece(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        if self.active.try_rotate(&self.board) {
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    /// One gravity step. Locks the piece when it cannot fall and its bounding
    /// box is fully inside the board.
    pub fn tick(&mut self) {
        if self.state != GameState::Running {
            return;
        }

        self.combo_ticks = self.combo_ticks.saturating_sub(1);
        self.celebration_ticks = self.celebration_ticks.saturating_sub(1);

        if !self.active.try_move(&self.board, 0, 1)
            && self.active.fits_vertically(self.board.height())
        {
            self.lock_and_spawn();
        }

        if self.state == GameState::Running
            && self.score > self.high_score
            && self.celebration_ticks == 0
        {
            self.celebration_ticks = CELEBRATION_TICKS;
        }
    }

    fn lock_and_spawn(&mut self) {
        self.board.commit(&self.active.shape, self.active.position);
        self.events.push(GameEvent::PieceLocked);
        log::debug!(
            "locked {:?} at ({}, {})",
            self.active.shape.kind(),
            self.active.position.x,
            self.active.position.y
        );

        let lines = self.board.clear_full_rows();
        if lines > 0 {
            self.events.push(GameEvent::LinesCleared(lines));
        }
        self.add_score(lines);
        self.spawn_next_piece();
    }

    pub fn add_score(&mut self, lines: u32) {
        self.score += score_for(lines);
        self.lines_cleared += lines;

        if lines >= COMBO_MIN_ROWS {
            self.combo_ticks = COMBO_EFFECT_TICKS;
            self.events.push(GameEvent::Combo(lines));
            log::debug!("combo: {lines} rows");
        }
    }

    /// No-op unless running, so a finished session never reports game over twice.
    fn spawn_next_piece(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let upcoming = self.piece_provider.next_shape();
        let shape = std::mem::replace(&mut self.next_shape, upcoming);
        let (active, ok) = ActivePiece::spawn(shape, &self.board);
        self.active = active;

        if ok {
            self.events.push(GameEvent::PieceSpawned);
        } else {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!("game over with score {}", self.score);

        if self.score > self.high_score {
            let previous = self.high_score;
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore {
                score: self.score,
                previous,
            });
            log::info!("new high score {} (previous {previous})", self.score);
            if let Err(err) = self.store.save(self.high_score) {
                log::warn!("failed to save high score: {err}");
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
                log::debug!("paused");
            }
            GameState::Paused => {
                self.state = GameState::Running;
                self.events.push(GameEvent::Unpaused);
                log::debug!("resumed");
            }
            GameState::GameOver => {}
        }
    }

    /// Takes effect on the next restart.
    pub fn select_mode(&mut self, mode: Mode) {
        self.pending_mode = Some(mode);
    }

    pub fn pending_mode(&self) -> Option<Mode> {
        self.pending_mode
    }

    pub fn restart(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines_cleared = 0;
        self.combo_ticks = 0;
        self.celebration_ticks = 0;
        self.state = GameState::Running;
        self.events.clear();

        if let Some(mode) = self.pending_mode.take() {
            self.mode = mode;
        }
        self.high_score = load_high_score(self.store.as_mut());

        self.next_shape = self.piece_provider.next_shape();
        self.spawn_next_piece();

        self.events.push(GameEvent::GameRestarted);
        log::debug!("restarted in {} mode", self.mode);
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn is_new_high_score(&self) -> bool {
        self.state != GameState::GameOver && self.score > self.high_score
    }

    /// Board occupancy with the active piece overlaid. Cells above row 0 are dropped.
    pub fn render_grid(&self) -> Vec<Vec<bool>> {
        overlay(&self.board, &self.active)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active: self.active.clone(),
            next_shape: self.next_shape.clone(),
            score: self.score,
            high_score: self.high_score,
            lines_cleared: self.lines_cleared,
            mode: self.mode,
            state: self.state,
            combo_ticks: self.combo_ticks,
            celebration_ticks: self.celebration_ticks,
        }
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
