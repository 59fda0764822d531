use std::io::{self, Stderr, Write};

use thiserror::Error;
use tracing::warn;

/// Which sound to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Eat,
    GameOver,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Io(#[from] io::Error),
}

/// Something that can make a noise
pub trait SoundSink {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

/// Rings the terminal bell: once for food, twice for game over
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        let bells: &[u8] = match cue {
            Cue::Eat => b"\x07",
            Cue::GameOver => b"\x07\x07",
        };
        self.out.write_all(bells)?;
        self.out.flush()?;
        Ok(())
    }
}

/// On/off switch in front of a [`SoundSink`]
pub struct Audio {
    enabled: bool,
    sink: Box<dyn SoundSink>,
}

impl Audio {
    pub fn new(sink: Box<dyn SoundSink>, enabled: bool) -> Self {
        Self { enabled, sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip sound on or off, returning the new setting
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }

        if let Err(err) = self.sink.play(cue) {
            warn!(?cue, error = %err, "sound playback failed");
        }
    }
}
