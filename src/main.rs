use std::io::{self, stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use blockfall::config::GAME_OVER_LINGER_TICKS;
use blockfall::high_score::{load_high_score, DEFAULT_HIGH_SCORE_FILE};
use blockfall::{
    Command, FileHighScoreStore, GameEvent, GameState, Mode, PieceProvider, RandomPieceProvider,
    Session, Shape, Snapshot, TetrominoType, TickIntervals, TickScheduler,
};

/// Terminal falling-block puzzle.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Difficulty preselected in the menu (easy, medium, hard).
    #[arg(short, long, default_value_t = Mode::Medium)]
    mode: Mode,

    /// Tick interval for easy mode, in milliseconds.
    #[arg(long, default_value_t = blockfall::config::EASY_TICK_MS)]
    easy_ms: u64,

    /// Tick interval for medium mode, in milliseconds.
    #[arg(long, default_value_t = blockfall::config::MEDIUM_TICK_MS)]
    medium_ms: u64,

    /// Tick interval for hard mode, in milliseconds.
    #[arg(long, default_value_t = blockfall::config::HARD_TICK_MS)]
    hard_ms: u64,

    /// File holding the highest score.
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,

    /// Seed for a reproducible piece sequence.
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const LOCKED_COLOR: Color = Color::Green;
const MENU_IDLE_POLL: Duration = Duration::from_millis(250);

fn tetromino_color(t: TetrominoType) -> Color {
    match t {
        TetrominoType::I => Color::Cyan,
        TetrominoType::O => Color::Yellow,
        TetrominoType::T => Color::Magenta,
        TetrominoType::S => Color::LightGreen,
        TetrominoType::Z => Color::Red,
        TetrominoType::J => Color::Blue,
        TetrominoType::L => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// App
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MenuItem {
    Start,
    Mode(Mode),
    HighScore,
    Exit,
}

const MENU_ITEMS: [MenuItem; 6] = [
    MenuItem::Start,
    MenuItem::Mode(Mode::Easy),
    MenuItem::Mode(Mode::Medium),
    MenuItem::Mode(Mode::Hard),
    MenuItem::HighScore,
    MenuItem::Exit,
];

struct Playing {
    session: Session,
    scheduler: TickScheduler,
    game_over_at: Option<Instant>,
    /// Previous best when this game set a new record.
    record: Option<u32>,
}

enum Screen {
    Menu { selected: usize },
    Playing(Box<Playing>),
}

struct App {
    screen: Screen,
    mode: Mode,
    intervals: TickIntervals,
    high_score: u32,
    high_score_file: PathBuf,
    seed: Option<u64>,
    games_started: u64,
}

impl App {
    fn new(args: Args) -> Self {
        let mut store = FileHighScoreStore::new(&args.high_score_file);
        let high_score = load_high_score(&mut store);
        Self {
            screen: Screen::Menu { selected: 0 },
            mode: args.mode,
            intervals: TickIntervals {
                easy_ms: args.easy_ms,
                medium_ms: args.medium_ms,
                hard_ms: args.hard_ms,
            },
            high_score,
            high_score_file: args.high_score_file,
            seed: args.seed,
            games_started: 0,
        }
    }

    fn start_game(&mut self) {
        let provider: Box<dyn PieceProvider> = match self.seed {
            Some(seed) => Box::new(RandomPieceProvider::seeded(seed.wrapping_add(self.games_started))),
            None => Box::new(RandomPieceProvider::new()),
        };
        self.games_started += 1;

        let store = Box::new(FileHighScoreStore::new(&self.high_score_file));
        let session = Session::with_provider(self.mode, provider, store);
        let scheduler = TickScheduler::new(self.mode.interval(&self.intervals));
        self.screen = Screen::Playing(Box::new(Playing {
            session,
            scheduler,
            game_over_at: None,
            record: None,
        }));
    }

    fn to_menu(&mut self) {
        if let Screen::Playing(playing) = &self.screen {
            self.high_score = self.high_score.max(playing.session.high_score);
        }
        self.screen = Screen::Menu { selected: 0 };
    }

    fn poll_timeout(&self) -> Duration {
        match &self.screen {
            Screen::Playing(playing) => playing.scheduler.timeout().unwrap_or(MENU_IDLE_POLL),
            Screen::Menu { .. } => MENU_IDLE_POLL,
        }
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match &mut self.screen {
            Screen::Menu { selected } => match code {
                KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => {
                    *selected = (*selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
                }
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => {
                    *selected = (*selected + 1) % MENU_ITEMS.len();
                }
                KeyCode::Enter | KeyCode::Char(' ') => match MENU_ITEMS[*selected] {
                    MenuItem::Start => self.start_game(),
                    MenuItem::Mode(mode) => self.mode = mode,
                    MenuItem::HighScore => {}
                    MenuItem::Exit => return false,
                },
                KeyCode::Esc | KeyCode::Char('q') => return false,
                _ => {}
            },
            Screen::Playing(playing) => {
                let command = match code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        self.to_menu();
                        return true;
                    }
                    KeyCode::Char('a') | KeyCode::Left => Some(Command::MoveLeft),
                    KeyCode::Char('d') | KeyCode::Right => Some(Command::MoveRight),
                    KeyCode::Char('s') | KeyCode::Down => Some(Command::SoftDrop),
                    KeyCode::Char('w') | KeyCode::Up => Some(Command::Rotate),
                    KeyCode::Char(' ') => Some(Command::TogglePause),
                    KeyCode::Char('p') | KeyCode::Char('r') => Some(Command::Restart),
                    _ => None,
                };
                if let Some(command) = command {
                    playing.session.apply(command);
                    if command == Command::Restart {
                        playing.scheduler.rearm();
                        playing.game_over_at = None;
                        playing.record = None;
                    }
                }
            }
        }
        true
    }

    fn update(&mut self) {
        let Screen::Playing(playing) = &mut self.screen else {
            return;
        };

        if playing.scheduler.fire_if_due() {
            playing.session.tick();
        }

        for event in playing.session.take_events() {
            if let GameEvent::NewHighScore { previous, .. } = event {
                playing.record = Some(previous);
            }
        }

        if playing.session.state == GameState::GameOver && playing.game_over_at.is_none() {
            playing.scheduler.disarm();
            playing.game_over_at = Some(Instant::now());
        }

        let linger = playing.scheduler.interval() * GAME_OVER_LINGER_TICKS;
        if playing.game_over_at.is_some_and(|at| at.elapsed() >= linger) {
            self.to_menu();
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();

    match &app.screen {
        Screen::Menu { selected } => render_menu(frame, app, *selected, area),
        Screen::Playing(playing) => {
            let snapshot = playing.session.snapshot();
            render_game(frame, &snapshot, area);
            match snapshot.state {
                GameState::Running => {}
                GameState::Paused => render_paused(frame, area),
                GameState::GameOver => render_game_over(frame, &snapshot, playing.record, area),
            }
        }
    }
}

fn render_menu(frame: &mut Frame, app: &App, selected: usize, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "BLOCKFALL",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let text = match item {
            MenuItem::Start => "Start New Game".to_string(),
            MenuItem::Mode(mode) if *mode == app.mode => format!("{mode} Mode [Selected]"),
            MenuItem::Mode(mode) => format!("{mode} Mode"),
            MenuItem::HighScore => format!("Highest Score: {}", app.high_score),
            MenuItem::Exit => "Exit".to_string(),
        };
        let style = if i == selected {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "↑↓: Select | Enter: Choose | Q/ESC: Quit",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Menu ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(paragraph, centered_rect(44, 20, area));
}

fn render_game(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let grid_display_width = (snapshot.board.width() as u16 * CELL_WIDTH) + 2;
    let grid_display_height = snapshot.board.height() as u16 + 2;
    let preview_width = 12;
    let info_width = 20;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Preview][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, snapshot, horizontal[0]);
    render_preview(frame, &snapshot.next_shape, horizontal[1]);
    render_info(frame, snapshot, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "A/D: Move | S: Drop | W: Rotate | Space: Pause | P: Restart | Q/ESC: Menu",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let border_color = if snapshot.combo_ticks > 0 {
        Color::Yellow
    } else {
        Color::Reset
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Overlay cells not locked on the board belong to the active piece.
    let active_color = tetromino_color(snapshot.active.shape.kind());
    let mut lines: Vec<Line> = Vec::new();

    for (y, row) in snapshot.render_grid().iter().enumerate() {
        let mut spans: Vec<Span> = Vec::new();

        for (x, &filled) in row.iter().enumerate() {
            let span = if !filled {
                Span::raw(EMPTY_CHAR)
            } else if snapshot.board.is_filled(x, y) {
                Span::styled(BLOCK_CHAR, Style::default().fg(LOCKED_COLOR))
            } else {
                Span::styled(BLOCK_CHAR, Style::default().fg(active_color))
            };
            spans.push(span);
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, shape: &Shape, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let color = tetromino_color(shape.kind());
    let mut lines: Vec<Line> = vec![Line::from("")];

    for row in 0..shape.rows() {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for col in 0..shape.cols() {
            if shape.is_filled(row, col) {
                spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", snapshot.score)),
        Line::from(""),
        Line::from(Span::styled("Highest", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", snapshot.high_score)),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Green))),
        Line::from(format!("{}", snapshot.lines_cleared)),
        Line::from(""),
        Line::from(Span::styled("Mode", Style::default().fg(Color::Magenta))),
        Line::from(snapshot.mode.label()),
        Line::from(""),
    ];

    if snapshot.is_new_high_score() && snapshot.celebration_ticks % 2 == 0 {
        lines.push(Line::from(Span::styled(
            "New High Score!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    if snapshot.combo_ticks > 0 {
        lines.push(Line::from(Span::styled(
            "COMBO!",
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, snapshot: &Snapshot, record: Option<u32>, area: Rect) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
    ];

    match record {
        Some(previous) => {
            text.push(Line::from(Span::styled(
                "Congratulations!",
                Style::default().fg(Color::Yellow),
            )));
            text.push(Line::from(Span::styled(
                format!("New High Score: {}!", snapshot.score),
                Style::default().fg(Color::Green),
            )));
            text.push(Line::from(Span::styled(
                format!("Previous Best: {previous}"),
                Style::default().fg(Color::Green),
            )));
        }
        None => {
            text.push(Line::from(format!("Your Score: {}", snapshot.score)));
            text.push(Line::from(format!("Highest Score: {}", snapshot.high_score)));
        }
    }

    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "P: Restart | ESC: Menu",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(28, 11, area));
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press Space to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC for menu",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(28, 10, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }

        app.update();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = App::new(args);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Always try to restore terminal state.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    result.map_err(Into::into)
}
