/// High-score persistence: one integer in a per-user config file.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::PersistError;

const APP_DIR: &str = "invaders";
const FILE_NAME: &str = "highscore.txt";

pub trait ScoreStore {
    fn load(&self) -> Result<u32, PersistError>;
    fn save(&mut self, high_score: u32) -> Result<(), PersistError>;
}

/// `<config dir>/invaders/highscore.txt`, or `None` when the platform has no
/// notion of a per-user config directory.
pub fn default_score_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
}

/// Stores the score as plain decimal text.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: Option<PathBuf>,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreStore { path: Some(path.into()) }
    }

    /// Store at the per-user default location.
    pub fn at_default_location() -> Self {
        FileScoreStore { path: default_score_path() }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_path(&self) -> Result<&Path, PersistError> {
        self.path.as_deref().ok_or(PersistError::NoConfigDir)
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<u32, PersistError> {
        let path = self.require_path()?;
        let contents = fs::read_to_string(path).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.trim().parse().map_err(|_| PersistError::Parse {
            path: path.to_path_buf(),
            contents,
        })
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistError> {
        let path = self.require_path()?;
        let io_err = |source| PersistError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, high_score.to_string()).map_err(io_err)
    }
}

/// Keeps the score in memory.  Clones share the same slot, which lets a
/// caller watch what a session persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    inner: Rc<RefCell<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    value: Option<u32>,
    saves: usize,
}

impl MemoryScoreStore {
    pub fn with_score(score: u32) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().value = Some(score);
        store
    }

    pub fn value(&self) -> Option<u32> {
        self.inner.borrow().value
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.inner.borrow().saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, PersistError> {
        Ok(self.inner.borrow().value.unwrap_or(0))
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistError> {
        let mut slot = self.inner.borrow_mut();
        slot.value = Some(high_score);
        slot.saves += 1;
        Ok(())
    }
}
