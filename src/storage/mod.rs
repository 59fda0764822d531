//! Persistent high score.
//!
//! A store holds one non-negative integer under a named slot. Failures are
//! reported to the caller as [`StoreError`]; [`HighScore`] logs them and keeps
//! the game going.

mod high_score;

pub use high_score::{DEFAULT_SLOT, HighScore, JsonFileStore, MemoryStore, ScoreStore, StoreError};
