use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Base game speed, picked before a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Difficulty {
    /// Tick interval at level 1, in milliseconds
    pub fn base_interval_ms(&self) -> u64 {
        match self {
            Self::Slow => 150,
            Self::Medium => 100,
            Self::Fast => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Medium => "Medium",
            Self::Fast => "Fast",
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cells along each side of the square board
    pub tile_count: usize,
    pub difficulty: Difficulty,
    /// Score added for each food eaten
    pub points_per_food: u32,
    /// Score needed per level
    pub level_threshold: u32,
    pub max_level: u32,
    /// Milliseconds shaved off the tick interval per level
    pub speed_step_ms: u64,
    /// Interval floor when a game starts or resumes
    pub min_start_interval_ms: u64,
    /// Interval floor after a level-up
    pub min_level_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            difficulty: Difficulty::default(),
            points_per_food: 10,
            level_threshold: 50,
            max_level: 10,
            speed_step_ms: 5,
            min_start_interval_ms: 25,
            min_level_interval_ms: 30,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Validate configuration parameters
    ///
    /// # Example
    ///
    /// ```rust
    /// use term_snake::game::GameConfig;
    ///
    /// let mut config = GameConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.tile_count = 1;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_count < 2 {
            return Err(format!(
                "tile_count must be at least 2, got {}",
                self.tile_count
            ));
        }

        if self.tile_count > i32::MAX as usize {
            return Err(format!("tile_count {} is too large", self.tile_count));
        }

        if self.points_per_food == 0 {
            return Err("points_per_food must be at least 1".to_string());
        }

        if self.level_threshold == 0 {
            return Err("level_threshold must be at least 1".to_string());
        }

        if self.max_level == 0 {
            return Err("max_level must be at least 1".to_string());
        }

        Ok(())
    }

    /// Level reached for a given score, capped at `max_level`
    pub fn level_for_score(&self, score: u32) -> u32 {
        (score / self.level_threshold + 1).min(self.max_level)
    }

    fn raw_interval_ms(&self, level: u32) -> u64 {
        let slowdown = u64::from(level.saturating_sub(1)) * self.speed_step_ms;
        self.difficulty.base_interval_ms().saturating_sub(slowdown)
    }

    /// Tick interval used when a game starts or resumes
    pub fn start_interval_ms(&self, level: u32) -> u64 {
        self.raw_interval_ms(level).max(self.min_start_interval_ms)
    }

    /// Tick interval used right after a level-up
    pub fn level_interval_ms(&self, level: u32) -> u64 {
        self.raw_interval_ms(level).max(self.min_level_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_count, 20);
        assert_eq!(config.points_per_food, 10);
        assert_eq!(config.level_threshold, 50);
        assert_eq!(config.max_level, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_level_curve() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_score(0), 1);
        assert_eq!(config.level_for_score(49), 1);
        assert_eq!(config.level_for_score(59), 2);
        assert_eq!(config.level_for_score(450), 10);
        assert_eq!(config.level_for_score(10_000), 10);
    }

    #[test]
    fn test_interval_floors() {
        let config = GameConfig::default().with_difficulty(Difficulty::Fast);
        assert_eq!(config.start_interval_ms(1), 60);
        assert_eq!(config.level_interval_ms(2), 55);
        // 60 - 9 * 5 = 15, clamped to each floor
        assert_eq!(config.start_interval_ms(10), 25);
        assert_eq!(config.level_interval_ms(10), 30);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = GameConfig::small();
        config.level_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.max_level = 0;
        assert!(config.validate().is_err());
    }
}
