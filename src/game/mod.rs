//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering
//! dependencies. Collaborators react to the [`GameEvent`]s the engine returns.

pub mod action;
pub mod config;
pub mod engine;
pub mod events;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{Difficulty, GameConfig};
pub use engine::GameEngine;
pub use events::GameEvent;
pub use state::{GameState, Phase, Position, Snake, Snapshot};
