use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use term_snake::audio::{Audio, TerminalBell};
use term_snake::game::{Difficulty, GameConfig, GameEngine};
use term_snake::modes::PlayMode;
use term_snake::render::Theme;
use term_snake::storage::{HighScore, JsonFileStore, MemoryStore, ScoreStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Snake in the terminal with levels, themes and a high score")]
struct Cli {
    /// Cells along each side of the board
    #[arg(long, default_value_t = 20)]
    tile_count: usize,

    /// Starting speed
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Colour theme
    #[arg(long, value_enum, default_value_t = Theme::Default)]
    theme: Theme,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file (RUST_LOG controls the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = GameConfig::new(cli.tile_count).with_difficulty(cli.difficulty);
    config.validate().map_err(anyhow::Error::msg)?;

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let store: Box<dyn ScoreStore> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(cli.high_score_file))
    };
    let high_score = HighScore::load(store);
    let audio = Audio::new(Box::new(TerminalBell::stderr()), !cli.mute);

    let mut play_mode = PlayMode::new(engine, high_score, audio, cli.theme);
    play_mode.run().await?;

    Ok(())
}

/// Log to a file only; the terminal belongs to the game
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
