use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const DEFAULT_HIGH_SCORE_FILE: &str = "highest_score.txt";

// ============================================================================
// Store Trait
// ============================================================================

/// Durable home of the single high-score integer.
pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&mut self) -> io::Result<Option<u32>>;
    fn save(&mut self, score: u32) -> io::Result<()>;
}

/// Reads the stored high score. Any failure yields 0, and 0 is written back
/// so the next load finds a value.
pub fn load_high_score(store: &mut dyn HighScoreStore) -> u32 {
    match store.load() {
        Ok(Some(score)) => score,
        Ok(None) => {
            log::debug!("no stored high score, writing default");
            save_default(store);
            0
        }
        Err(err) => {
            log::warn!("failed to read high score: {err}");
            save_default(store);
            0
        }
    }
}

fn save_default(store: &mut dyn HighScoreStore) {
    if let Err(err) = store.save(0) {
        log::warn!("failed to write default high score: {err}");
    }
}

// ============================================================================
// File Store
// ============================================================================

pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&mut self) -> io::Result<Option<u32>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        contents
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        std::fs::write(&self.path, score.to_string())
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Shared-handle store: clones observe the same value and save counter.
#[derive(Clone, Default)]
pub struct MemoryHighScoreStore {
    value: Rc<Cell<Option<u32>>>,
    saves: Rc<Cell<usize>>,
    fail_saves: Rc<Cell<bool>>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u32) -> Self {
        let store = Self::default();
        store.value.set(Some(score));
        store
    }

    pub fn value(&self) -> Option<u32> {
        self.value.get()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Makes subsequent saves fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> io::Result<Option<u32>> {
        Ok(self.value.get())
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        self.saves.set(self.saves.get() + 1);
        if self.fail_saves.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "save rejected"));
        }
        self.value.set(Some(score));
        Ok(())
    }
}
