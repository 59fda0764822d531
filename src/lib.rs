//! Term Snake - the classic snake game in a terminal
//!
//! This library provides:
//! - Headless game rules that return events instead of doing I/O (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering with colour themes (render module)
//! - Sound cues and the persistent high score (audio, storage modules)
//! - The interactive loop tying them together (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
