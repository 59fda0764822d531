use std::time::{Duration, Instant};

/// Statistics for one run of the program, spanning many games.
///
/// The play clock only advances while a game is running, so time spent
/// paused or on the start screen is not counted.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub games_played: u32,
    /// Best score reached during this session only
    pub session_best: u32,
    game_time: Duration,
    running_since: Option<Instant>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            games_played: 0,
            session_best: 0,
            game_time: Duration::ZERO,
            running_since: None,
        }
    }

    pub fn on_game_start(&mut self) {
        self.on_game_start_at(Instant::now());
    }

    pub fn on_pause(&mut self) {
        self.stop_clock_at(Instant::now());
    }

    pub fn on_resume(&mut self) {
        self.running_since = Some(Instant::now());
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_game_over_at(final_score, Instant::now());
    }

    /// A fresh game was prepared; clear the clock
    pub fn on_reset(&mut self) {
        self.game_time = Duration::ZERO;
        self.running_since = None;
    }

    /// Play time of the current game
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed())
    }

    fn on_game_start_at(&mut self, now: Instant) {
        self.game_time = Duration::ZERO;
        self.running_since = Some(now);
    }

    fn on_game_over_at(&mut self, final_score: u32, now: Instant) {
        self.stop_clock_at(now);
        self.games_played += 1;
        self.session_best = self.session_best.max(final_score);
    }

    fn stop_clock_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.game_time += now.saturating_duration_since(since);
        }
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or(Duration::ZERO);
        self.game_time + running
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
