use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

// Timing (in milliseconds)
pub const EASY_TICK_MS: u64 = 500;
pub const MEDIUM_TICK_MS: u64 = 300;
pub const HARD_TICK_MS: u64 = 100;

/// Number of ticks the game-over screen stays up before the host returns to the menu.
pub const GAME_OVER_LINGER_TICKS: u32 = 20;

// ============================================================================
// Difficulty
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Easy, Mode::Medium, Mode::Hard];

    pub fn interval(&self, intervals: &TickIntervals) -> Duration {
        let ms = match self {
            Mode::Easy => intervals.easy_ms,
            Mode::Medium => intervals.medium_ms,
            Mode::Hard => intervals.hard_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Easy => "Easy",
            Mode::Medium => "Medium",
            Mode::Hard => "Hard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode '{}' (expected easy, medium or hard)", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Mode::Easy),
            "medium" => Ok(Mode::Medium),
            "hard" => Ok(Mode::Hard),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Per-mode tick cadence. Hosts may override any entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TickIntervals {
    pub easy_ms: u64,
    pub medium_ms: u64,
    pub hard_ms: u64,
}

impl Default for TickIntervals {
    fn default() -> Self {
        Self {
            easy_ms: EASY_TICK_MS,
            medium_ms: MEDIUM_TICK_MS,
            hard_ms: HARD_TICK_MS,
        }
    }
}
