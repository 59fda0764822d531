use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::info;

use crate::audio::{Audio, Cue};
use crate::game::{GameEngine, GameEvent, Phase, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::{Renderer, Theme, View};
use crate::storage::HighScore;

/// Redraw rate, independent of game speed
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Tick timer driven by engine events
#[derive(Default)]
struct TickScheduler {
    timer: Option<Interval>,
}

impl TickScheduler {
    /// Cancel any running timer and start a new one at `period`
    fn restart(&mut self, period: Duration) {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
    }

    fn stop(&mut self) {
        self.timer = None;
    }

    fn period(&self) -> Option<Duration> {
        self.timer.as_ref().map(Interval::period)
    }

    /// Resolves on the next tick, or never while stopped
    async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

pub struct PlayMode {
    engine: GameEngine,
    snapshot: Snapshot,
    scheduler: TickScheduler,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: Audio,
    high_score: HighScore,
    stats: SessionStats,
    theme: Theme,
    new_record: bool,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine, high_score: HighScore, audio: Audio, theme: Theme) -> Self {
        let snapshot = engine.snapshot();

        Self {
            engine,
            snapshot,
            scheduler: TickScheduler::default(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            audio,
            high_score,
            stats: SessionStats::new(),
            theme,
            new_record: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = self.scheduler.tick() => {
                    let events = self.engine.tick();
                    self.dispatch(events);
                }

                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        let view = self.view();
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games_played = self.stats.games_played,
            session_best = self.stats.session_best,
            "session finished"
        );
        Ok(())
    }

    fn view(&self) -> View<'_> {
        View {
            snapshot: &self.snapshot,
            tile_count: self.engine.config().tile_count,
            theme: self.theme,
            difficulty: self.engine.config().difficulty,
            sound_enabled: self.audio.is_enabled(),
            high_score: self.high_score.best(),
            new_record: self.new_record,
            stats: &self.stats,
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Game(command) => {
                let events = self.engine.apply(command);
                self.dispatch(events);
                self.snapshot = self.engine.snapshot();
            }
            KeyAction::SelectDifficulty(difficulty) => {
                if self.engine.set_difficulty(difficulty) {
                    info!(difficulty = difficulty.as_str(), "difficulty selected");
                    self.snapshot = self.engine.snapshot();
                }
            }
            KeyAction::CycleTheme => {
                self.theme = self.theme.next();
                info!(theme = self.theme.as_str(), "theme selected");
            }
            KeyAction::ToggleSound => {
                let enabled = self.audio.toggle();
                info!(enabled, "sound toggled");
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    /// Carry out what the engine asked for
    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in events {
            if let Some(interval_ms) = event.new_interval_ms() {
                self.scheduler.restart(Duration::from_millis(interval_ms));
            }

            match &event {
                GameEvent::Started { .. } => {
                    self.new_record = false;
                    self.stats.on_game_start();
                }
                GameEvent::Paused => {
                    self.scheduler.stop();
                    self.stats.on_pause();
                }
                GameEvent::Resumed { .. } => {
                    self.stats.on_resume();
                }
                GameEvent::FoodEaten { .. } => {
                    self.audio.play(Cue::Eat);
                }
                GameEvent::SpeedChanged { .. } => {}
                GameEvent::StateUpdated(snapshot) => {
                    if snapshot.phase == Phase::Idle {
                        self.stats.on_reset();
                    }
                }
                GameEvent::GameOver { final_score, .. } => {
                    self.scheduler.stop();
                    self.audio.play(Cue::GameOver);
                    self.stats.on_game_over(*final_score);
                    self.new_record = self.high_score.record(*final_score);
                }
            }

            if let Some(snapshot) = event.snapshot() {
                self.snapshot = snapshot.clone();
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::TerminalBell;
    use crate::game::{Command, Difficulty, Direction, GameConfig, GameState, Position, Snake};
    use crate::storage::MemoryStore;

    fn play_mode(engine: GameEngine) -> PlayMode {
        PlayMode::new(
            engine,
            HighScore::load(Box::new(MemoryStore::new())),
            Audio::new(Box::new(TerminalBell::new(std::io::sink())), true),
            Theme::Default,
        )
    }

    /// Running game whose next tick eats food at (6, 5)
    fn about_to_eat(score: u32) -> GameEngine {
        let snake = Snake::from_segments([Position::new(5, 5)], Some(Direction::Right)).unwrap();
        let mut state = GameState::new(snake, Position::new(6, 5), 100);
        state.phase = Phase::Running;
        state.score = score;
        GameEngine::with_state(GameConfig::default(), state, 3)
    }

    /// Running game whose next tick runs into its own body
    fn about_to_crash(score: u32) -> GameEngine {
        let snake = Snake::from_segments(
            [(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]
                .into_iter()
                .map(|(x, y)| Position::new(x, y)),
            Some(Direction::Down),
        )
        .unwrap();
        let mut state = GameState::new(snake, Position::new(0, 0), 100);
        state.phase = Phase::Running;
        state.score = score;
        GameEngine::with_state(GameConfig::small(), state, 3)
    }

    #[tokio::test]
    async fn test_start_begins_ticking() {
        let mut mode = play_mode(GameEngine::with_seed(GameConfig::default(), 1));
        assert_eq!(mode.scheduler.period(), None);

        mode.handle_action(KeyAction::Game(Command::Start));

        assert_eq!(mode.snapshot.phase, Phase::Running);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_pause_stops_and_resume_restarts_timer() {
        let mut mode = play_mode(GameEngine::with_seed(GameConfig::default(), 1));
        mode.handle_action(KeyAction::Game(Command::Start));

        mode.handle_action(KeyAction::Game(Command::TogglePause));
        assert_eq!(mode.snapshot.phase, Phase::Paused);
        assert_eq!(mode.scheduler.period(), None);

        mode.handle_action(KeyAction::Game(Command::TogglePause));
        assert_eq!(mode.snapshot.phase, Phase::Running);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_level_up_restarts_timer_at_new_speed() {
        let mut mode = play_mode(about_to_eat(40));
        mode.scheduler.restart(Duration::from_millis(100));

        let events = mode.engine.tick();
        mode.dispatch(events);

        assert_eq!(mode.snapshot.score, 50);
        assert_eq!(mode.snapshot.level, 2);
        assert_eq!(mode.scheduler.period(), Some(Duration::from_millis(95)));
    }

    #[tokio::test]
    async fn test_game_over_records_high_score() {
        let mut mode = play_mode(about_to_crash(120));
        mode.scheduler.restart(Duration::from_millis(100));

        let events = mode.engine.tick();
        mode.dispatch(events);

        assert_eq!(mode.snapshot.phase, Phase::GameOver);
        assert_eq!(mode.scheduler.period(), None);
        assert!(mode.new_record);
        assert_eq!(mode.high_score.best(), 120);
        assert_eq!(mode.stats.games_played, 1);

        // Restart prepares a new game without ticking
        mode.handle_action(KeyAction::Game(Command::Restart));
        assert_eq!(mode.snapshot.phase, Phase::Idle);
        assert_eq!(mode.snapshot.score, 0);
        assert_eq!(mode.scheduler.period(), None);
        assert_eq!(mode.high_score.best(), 120);
    }

    #[tokio::test]
    async fn test_lower_score_is_not_a_record() {
        let mut high_score = HighScore::load(Box::new(MemoryStore::new()));
        high_score.record(500);
        let mut mode = PlayMode::new(
            about_to_crash(20),
            high_score,
            Audio::new(Box::new(TerminalBell::new(std::io::sink())), false),
            Theme::Red,
        );

        let events = mode.engine.tick();
        mode.dispatch(events);

        assert!(!mode.new_record);
        assert_eq!(mode.high_score.best(), 500);
    }

    #[test]
    fn test_settings_keys() {
        let mut mode = play_mode(GameEngine::with_seed(GameConfig::default(), 1));

        mode.handle_action(KeyAction::SelectDifficulty(Difficulty::Slow));
        assert_eq!(mode.snapshot.interval_ms, 150);
        assert_eq!(mode.view().difficulty, Difficulty::Slow);

        mode.handle_action(KeyAction::CycleTheme);
        assert_eq!(mode.theme, Theme::Blue);

        mode.handle_action(KeyAction::ToggleSound);
        assert!(!mode.view().sound_enabled);

        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
