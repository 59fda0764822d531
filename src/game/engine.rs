use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    action::{Command, Direction},
    config::{Difficulty, GameConfig},
    events::GameEvent,
    state::{GameState, Phase, Position, Snake, Snapshot},
};

/// Random draws tried before falling back to scanning for free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// The game engine that owns the state and applies all rules.
///
/// The engine does not drive its own timer. Each operation returns the
/// [`GameEvent`]s the surrounding application has to act on (restart the
/// tick timer, play a sound, redraw, persist a high score).
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    /// Create a prepared (idle) engine seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a prepared engine with a fixed seed, for reproducible games
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Resume from an explicit state, e.g. to replay a recorded position
    pub fn with_state(config: GameConfig, state: GameState, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            state,
        }
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let state = fresh_state(&config, &mut rng);
        Self { config, rng, state }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Dispatch a queued command to the matching operation
    pub fn apply(&mut self, command: Command) -> Vec<GameEvent> {
        match command {
            Command::Turn(direction) => {
                self.set_direction(direction);
                Vec::new()
            }
            Command::Start => self.start(),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart if self.state.phase == Phase::GameOver => self.reset(),
            Command::Restart => Vec::new(),
        }
    }

    /// Request a new heading for the next tick.
    ///
    /// Ignored unless running, when reversing onto the neck, or when a turn
    /// was already accepted since the last tick. Returns whether it was taken.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }

        if self.state.turned_this_tick {
            debug!(?requested, "turn ignored, already turned this tick");
            return false;
        }

        if let Some(current) = self.state.snake.direction {
            if current.is_opposite(requested) {
                debug!(?requested, ?current, "turn ignored, would reverse");
                return false;
            }
        }

        self.state.snake.direction = Some(requested);
        self.state.turned_this_tick = true;
        true
    }

    /// Begin a prepared game
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.state.phase != Phase::Idle {
            return Vec::new();
        }

        self.state.phase = Phase::Running;
        self.state.turned_this_tick = false;
        self.state.interval_ms = self.config.start_interval_ms(self.state.level);
        info!(
            interval_ms = self.state.interval_ms,
            difficulty = self.config.difficulty.as_str(),
            "game started"
        );

        vec![GameEvent::Started {
            interval_ms: self.state.interval_ms,
        }]
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        match self.state.phase {
            Phase::Running => {
                self.state.phase = Phase::Paused;
                info!("game paused");
                vec![GameEvent::Paused]
            }
            Phase::Paused => {
                self.state.phase = Phase::Running;
                let interval_ms = self.state.interval_ms.max(self.config.min_start_interval_ms);
                info!(interval_ms, "game resumed");
                vec![GameEvent::Resumed { interval_ms }]
            }
            Phase::Idle | Phase::GameOver => Vec::new(),
        }
    }

    /// Prepare a fresh game. Only valid when idle or after a game over.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        if !matches!(self.state.phase, Phase::Idle | Phase::GameOver) {
            return Vec::new();
        }

        self.state = fresh_state(&self.config, &mut self.rng);
        vec![GameEvent::StateUpdated(self.state.snapshot())]
    }

    /// Change the base speed before the game starts
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.state.phase != Phase::Idle {
            return false;
        }

        self.config.difficulty = difficulty;
        self.state.interval_ms = difficulty.base_interval_ms();
        true
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.state.phase != Phase::Running {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.state.turned_this_tick = false;
        self.state.ticks += 1;

        let tile_count = self.config.tile_count;
        let new_head = self
            .state
            .snake
            .head()
            .wrapped_step(self.state.snake.direction, tile_count);
        self.state.snake.push_head(new_head);

        if new_head == self.state.food {
            self.state.score += self.config.points_per_food;
            events.push(GameEvent::FoodEaten {
                score: self.state.score,
            });
            if let Some(event) = self.check_level_up() {
                events.push(event);
            }

            match spawn_food(&mut self.rng, &self.state.snake, tile_count) {
                Some(food) => self.state.food = food,
                None => {
                    info!(score = self.state.score, "board filled");
                    events.push(self.end_game());
                    return events;
                }
            }
        } else {
            self.state.snake.drop_tail();
        }

        if self.state.snake.collides_with_body(new_head) {
            events.push(self.end_game());
        } else {
            events.push(GameEvent::StateUpdated(self.state.snapshot()));
        }

        events
    }

    fn check_level_up(&mut self) -> Option<GameEvent> {
        let next_level = self.config.level_for_score(self.state.score);
        if next_level <= self.state.level || self.state.level >= self.config.max_level {
            return None;
        }

        self.state.level = next_level;
        self.state.interval_ms = self.config.level_interval_ms(next_level);
        info!(
            level = next_level,
            interval_ms = self.state.interval_ms,
            "level up"
        );

        Some(GameEvent::SpeedChanged {
            level: next_level,
            interval_ms: self.state.interval_ms,
        })
    }

    fn end_game(&mut self) -> GameEvent {
        self.state.phase = Phase::GameOver;
        info!(
            score = self.state.score,
            level = self.state.level,
            ticks = self.state.ticks,
            "game over"
        );

        GameEvent::GameOver {
            final_score: self.state.score,
            snapshot: self.state.snapshot(),
        }
    }
}

/// Centre start, no heading, new food, level 1
fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let center = (config.tile_count / 2) as i32;
    let snake = Snake::new(Position::new(center, center));
    // A single segment always leaves free cells on a valid board
    let food = spawn_food(rng, &snake, config.tile_count).unwrap_or(Position::new(0, 0));

    GameState::new(snake, food, config.difficulty.base_interval_ms())
}

/// Pick a uniformly random cell not covered by the snake.
///
/// Returns `None` once the snake covers the whole board.
fn spawn_food<R: Rng>(rng: &mut R, snake: &Snake, tile_count: usize) -> Option<Position> {
    let size = tile_count as i32;

    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !snake.occupies(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..size)
        .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();
    let food = free.choose(rng).copied();
    debug!(free_cells = free.len(), "food placed by scanning free cells");
    food
}
