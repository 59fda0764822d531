use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move one cell in `direction`, re-entering from the opposite edge.
    ///
    /// `None` leaves the position where it is.
    pub fn wrapped_step(&self, direction: Option<Direction>, tile_count: usize) -> Self {
        let (dx, dy) = direction.map(|d| d.delta()).unwrap_or((0, 0));
        let size = tile_count as i32;
        Self {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current heading, `None` until the first turn is accepted
    pub direction: Option<Direction>,
}

impl Snake {
    /// A single-segment snake that is not moving yet
    pub fn new(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction: None,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` when `segments` is empty.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Option<Direction>,
    ) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self { body, direction })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Check if `pos` lies on the body, never comparing against the head
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a snake built through this API
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Prepared, waiting for a start command
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Complete mutable game state owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub level: u32,
    /// Tick interval the scheduler should currently use
    pub interval_ms: u64,
    pub phase: Phase,
    pub ticks: u64,
    /// A turn has already been accepted since the last tick
    pub(crate) turned_this_tick: bool,
}

impl GameState {
    /// Create a fresh, idle state
    pub fn new(snake: Snake, food: Position, interval_ms: u64) -> Self {
        Self {
            snake,
            food,
            score: 0,
            level: 1,
            interval_ms,
            phase: Phase::Idle,
            ticks: 0,
            turned_this_tick: false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.segments().copied().collect(),
            direction: self.snake.direction,
            food: self.food,
            score: self.score,
            level: self.level,
            interval_ms: self.interval_ms,
            phase: self.phase,
            ticks: self.ticks,
        }
    }
}

/// Immutable copy of everything a renderer needs to draw a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Segments, head first
    pub snake: Vec<Position>,
    pub direction: Option<Direction>,
    pub food: Position,
    pub score: u32,
    pub level: u32,
    pub interval_ms: u64,
    pub phase: Phase,
    pub ticks: u64,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.wrapped_step(Some(Direction::Right), 10), Position::new(6, 5));
        assert_eq!(pos.wrapped_step(None, 10), pos);

        assert_eq!(
            Position::new(9, 3).wrapped_step(Some(Direction::Right), 10),
            Position::new(0, 3)
        );
        assert_eq!(
            Position::new(0, 3).wrapped_step(Some(Direction::Left), 10),
            Position::new(9, 3)
        );
        assert_eq!(
            Position::new(4, 0).wrapped_step(Some(Direction::Up), 10),
            Position::new(4, 9)
        );
        assert_eq!(
            Position::new(4, 9).wrapped_step(Some(Direction::Down), 10),
            Position::new(4, 0)
        );
    }

    #[test]
    fn test_snake_from_segments() {
        assert!(Snake::from_segments(Vec::new(), None).is_none());

        let snake = Snake::from_segments(
            [Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Some(Direction::Right),
        )
        .unwrap();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_collision_skips_head() {
        let snake = Snake::from_segments(
            [Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Some(Direction::Right),
        )
        .unwrap();
        assert!(!snake.collides_with_body(Position::new(5, 5)));
        assert!(snake.collides_with_body(Position::new(4, 5)));
        assert!(!snake.collides_with_body(Position::new(9, 9)));
        assert!(snake.occupies(Position::new(5, 5)));
    }

    #[test]
    fn test_tail_never_drops_last_segment() {
        let mut snake = Snake::new(Position::new(1, 1));
        snake.drop_tail();
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_snapshot_copies_state() {
        let state = GameState::new(Snake::new(Position::new(2, 2)), Position::new(7, 7), 100);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.snake, vec![Position::new(2, 2)]);
        assert_eq!(snapshot.head(), Some(Position::new(2, 2)));
        assert_eq!(snapshot.food, Position::new(7, 7));
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.level, 1);
    }
}
