use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::theme::{Palette, Theme};
use crate::game::{Difficulty, Direction as Heading, Phase, Position, Snapshot};
use crate::metrics::SessionStats;

/// Everything needed to draw one frame. The renderer keeps no game state.
pub struct View<'a> {
    pub snapshot: &'a Snapshot,
    pub tile_count: usize,
    pub theme: Theme,
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
    pub high_score: u32,
    /// The last finished game set a new high score
    pub new_record: bool,
    pub stats: &'a SessionStats,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);

        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let palette = view.theme.palette();
        match view.snapshot.phase {
            Phase::GameOver => {
                frame.render_widget(self.render_game_over(view, &palette), board_area);
            }
            Phase::Running => {
                frame.render_widget(self.render_grid(view, &palette), board_area);
            }
            Phase::Idle => {
                frame.render_widget(self.render_grid(view, &palette), board_area);
                let popup = popup_area(board_area, 36, 8);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_start_screen(view, &palette), popup);
            }
            Phase::Paused => {
                frame.render_widget(self.render_grid(view, &palette), board_area);
                let popup = popup_area(board_area, 28, 5);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_pause_screen(&palette), popup);
            }
        }

        frame.render_widget(self.render_controls(view.snapshot.phase), chunks[2]);
    }

    fn render_grid(&self, view: &View, palette: &Palette) -> Paragraph<'static> {
        let snapshot = view.snapshot;
        let head = snapshot.head();
        let background = Style::default().bg(palette.background);
        let mut lines = Vec::with_capacity(view.tile_count);

        for y in 0..view.tile_count {
            let mut spans = Vec::with_capacity(view.tile_count);

            for x in 0..view.tile_count {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    Span::styled(
                        head_glyph(snapshot.direction),
                        background
                            .fg(palette.snake_head)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("▓▓", background.fg(palette.snake_body))
                } else if pos == snapshot.food {
                    Span::styled(
                        "● ",
                        background.fg(palette.food).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("· ", background.fg(palette.grid))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(palette.snake_head))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &View) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let snapshot = view.snapshot;

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(view.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(view.stats.format_time(), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{}ms", snapshot.interval_ms), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start_screen(&self, view: &View, palette: &Palette) -> Paragraph<'static> {
        let key = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(palette.overlay_text);
        let sound = if view.sound_enabled { "On" } else { "Off" };

        let text = vec![
            Line::from(vec![
                Span::styled("Press ", text_style),
                Span::styled("Enter", key),
                Span::styled(" to start", text_style),
            ]),
            Line::from(""),
            setting_line("Difficulty", view.difficulty.as_str(), "1/2/3", text_style),
            setting_line("Theme", view.theme.as_str(), "T", text_style),
            setting_line("Sound", sound, "M", text_style),
            Line::from(vec![
                Span::styled("Games played: ", text_style),
                Span::styled(view.stats.games_played.to_string(), text_style),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().bg(palette.overlay))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(text_style)
                    .title(" Ready "),
            )
    }

    fn render_pause_screen(&self, palette: &Palette) -> Paragraph<'static> {
        let text_style = Style::default().fg(palette.overlay_text);
        let text = vec![
            Line::from(Span::styled(
                "PAUSED",
                text_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press P to resume", text_style)),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().bg(palette.overlay))
            .block(Block::default().borders(Borders::ALL).border_style(text_style))
    }

    fn render_game_over(&self, view: &View, palette: &Palette) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.snapshot.score.to_string(),
                    Style::default()
                        .fg(palette.overlay_text)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if view.new_record {
            text.push(Line::from(Span::styled(
                "NEW HIGH SCORE!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )));
        }

        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().bg(palette.overlay))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];

        if matches!(phase, Phase::Running | Phase::Paused) {
            spans.push(Span::styled("P", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" pause | "));
        }

        spans.extend([
            Span::styled("T", Style::default().fg(Color::Cyan)),
            Span::raw(" theme | "),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" sound | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn setting_line(name: &str, value: &str, key: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), style),
        Span::styled(value.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(format!(" [{key}]"), style.fg(Color::Cyan)),
    ])
}

/// Head cell, with the eyes facing the direction of travel
fn head_glyph(heading: Option<Heading>) -> &'static str {
    match heading {
        None => "██",
        Some(Heading::Up) => "▲▲",
        Some(Heading::Down) => "▼▼",
        Some(Heading::Left) => "◀█",
        Some(Heading::Right) => "█▶",
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn view<'a>(snapshot: &'a Snapshot, stats: &'a SessionStats, new_record: bool) -> View<'a> {
        View {
            snapshot,
            tile_count: 10,
            theme: Theme::Blue,
            difficulty: Difficulty::Fast,
            sound_enabled: false,
            high_score: 70,
            new_record,
            stats,
        }
    }

    #[test]
    fn test_start_screen_shows_settings() {
        let engine = GameEngine::with_seed(GameConfig::small(), 1);
        let snapshot = engine.snapshot();
        let stats = SessionStats::new();

        let screen = draw(&view(&snapshot, &stats, false));

        assert!(screen.contains("Press Enter to start"));
        assert!(screen.contains("Difficulty: Fast"));
        assert!(screen.contains("Theme: Blue"));
        assert!(screen.contains("Sound: Off"));
        assert!(screen.contains("Best: 70"));
    }

    #[test]
    fn test_running_board_draws_snake_and_food() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        engine.start();
        let snapshot = engine.snapshot();
        let stats = SessionStats::new();

        let screen = draw(&view(&snapshot, &stats, false));

        assert!(screen.contains("██"));
        assert!(screen.contains('●'));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_head_faces_direction_of_travel() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        engine.start();
        engine.set_direction(Heading::Left);
        let snapshot = engine.snapshot();
        let stats = SessionStats::new();

        let screen = draw(&view(&snapshot, &stats, false));

        assert!(screen.contains("◀█"));
        assert!(!screen.contains("██"));
    }

    #[test]
    fn test_head_glyphs() {
        assert_eq!(head_glyph(None), "██");
        assert_eq!(head_glyph(Some(Heading::Up)), "▲▲");
        assert_eq!(head_glyph(Some(Heading::Down)), "▼▼");
        assert_eq!(head_glyph(Some(Heading::Right)), "█▶");
    }

    #[test]
    fn test_game_over_screen() {
        let engine = GameEngine::with_seed(GameConfig::small(), 1);
        let mut snapshot = engine.snapshot();
        snapshot.phase = Phase::GameOver;
        snapshot.score = 80;
        let stats = SessionStats::new();

        let screen = draw(&view(&snapshot, &stats, true));

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Final Score: 80"));
        assert!(screen.contains("NEW HIGH SCORE!"));
    }

    #[test]
    fn test_pause_overlay() {
        let engine = GameEngine::with_seed(GameConfig::small(), 1);
        let mut snapshot = engine.snapshot();
        snapshot.phase = Phase::Paused;
        let stats = SessionStats::new();

        let screen = draw(&view(&snapshot, &stats, false));

        assert!(screen.contains("PAUSED"));
    }

    #[test]
    fn test_popup_fits_small_area() {
        let area = Rect::new(0, 0, 10, 4);
        let popup = popup_area(area, 36, 8);
        assert_eq!(popup, area);
    }
}
