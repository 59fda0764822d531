use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default slot name inside the high score file
pub const DEFAULT_SLOT: &str = "snake_high_score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access high score file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("high score file {path:?} is not a JSON object")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("slot `{slot}` does not hold a non-negative integer")]
    InvalidSlot { slot: String },
}

/// Somewhere a single high score can be kept between sessions
pub trait ScoreStore {
    /// Stored score, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<u32>, StoreError>;

    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Keeps the score in a JSON object on disk, one key per slot.
///
/// Other keys in the file are left untouched.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    slot: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_slot(path, DEFAULT_SLOT)
    }

    pub fn with_slot(path: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            slot: slot.into(),
        }
    }

    fn read_slots(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let Some(slots) = self.read_slots()? else {
            return Ok(None);
        };

        match slots.get(&self.slot) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|score| u32::try_from(score).ok())
                .map(Some)
                .ok_or_else(|| StoreError::InvalidSlot {
                    slot: self.slot.clone(),
                }),
        }
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let mut slots = match self.read_slots() {
            Ok(slots) => slots.unwrap_or_default(),
            Err(StoreError::Parse { .. }) => {
                warn!(path = ?self.path, "overwriting unreadable high score file");
                Map::new()
            }
            Err(err) => return Err(err),
        };
        slots.insert(self.slot.clone(), Value::from(score));

        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&Value::Object(slots)).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(io_err)?;

        debug!(path = ?self.path, score, "high score written");
        Ok(())
    }
}

/// Score kept only for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.score = Some(score);
        Ok(())
    }
}

/// Best score across sessions, read once and written when beaten.
///
/// Store failures are logged and otherwise ignored.
pub struct HighScore {
    best: u32,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load() {
            Ok(score) => score.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "could not read high score, starting from 0");
                0
            }
        };

        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished game. Returns true if it set a new high score.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }

        self.best = score;
        info!(score, "new high score");
        if let Err(err) = self.store.save(score) {
            warn!(error = %err, "could not save high score");
        }
        true
    }
}
