use super::state::Snapshot;

/// Side effects the engine asks its collaborators to carry out.
///
/// The engine never performs I/O itself. The scheduler, renderer, audio and
/// high-score store all react to these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The scheduler should begin ticking at this interval
    Started { interval_ms: u64 },
    /// The scheduler should stop ticking until resumed
    Paused,
    /// The scheduler should restart ticking at this interval
    Resumed { interval_ms: u64 },
    FoodEaten { score: u32 },
    /// A new level was reached; restart the tick timer at `interval_ms`
    SpeedChanged { level: u32, interval_ms: u64 },
    StateUpdated(Snapshot),
    GameOver { final_score: u32, snapshot: Snapshot },
}

impl GameEvent {
    /// Interval the scheduler must switch to, if this event changes it
    pub fn new_interval_ms(&self) -> Option<u64> {
        match self {
            GameEvent::Started { interval_ms }
            | GameEvent::Resumed { interval_ms }
            | GameEvent::SpeedChanged { interval_ms, .. } => Some(*interval_ms),
            _ => None,
        }
    }

    /// Snapshot for the renderer, if this event carries one
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            GameEvent::StateUpdated(snapshot) | GameEvent::GameOver { snapshot, .. } => {
                Some(snapshot)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameState, Position, Snake};

    #[test]
    fn test_interval_carrying_events() {
        assert_eq!(GameEvent::Started { interval_ms: 100 }.new_interval_ms(), Some(100));
        assert_eq!(GameEvent::Resumed { interval_ms: 90 }.new_interval_ms(), Some(90));
        assert_eq!(
            GameEvent::SpeedChanged { level: 2, interval_ms: 95 }.new_interval_ms(),
            Some(95)
        );
        assert_eq!(GameEvent::Paused.new_interval_ms(), None);
        assert_eq!(GameEvent::FoodEaten { score: 10 }.new_interval_ms(), None);
    }

    #[test]
    fn test_snapshot_carrying_events() {
        let state = GameState::new(Snake::new(Position::new(3, 3)), Position::new(1, 1), 100);
        let snapshot = state.snapshot();

        let updated = GameEvent::StateUpdated(snapshot.clone());
        assert_eq!(updated.snapshot(), Some(&snapshot));

        let over = GameEvent::GameOver {
            final_score: 40,
            snapshot: snapshot.clone(),
        };
        assert_eq!(over.snapshot(), Some(&snapshot));

        assert_eq!(GameEvent::Paused.snapshot(), None);
        assert_eq!(GameEvent::FoodEaten { score: 10 }.snapshot(), None);
    }
}
