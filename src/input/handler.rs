use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Difficulty, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forwarded to the engine
    Game(Command),
    SelectDifficulty(Difficulty),
    CycleTheme,
    ToggleSound,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            KeyCode::Enter => KeyAction::Game(Command::Start),
            KeyCode::Esc => KeyAction::Quit,

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => turn(Direction::Up),
                's' => turn(Direction::Down),
                'a' => turn(Direction::Left),
                'd' => turn(Direction::Right),

                ' ' => KeyAction::Game(Command::Start),
                'p' => KeyAction::Game(Command::TogglePause),
                'r' => KeyAction::Game(Command::Restart),

                '1' => KeyAction::SelectDifficulty(Difficulty::Slow),
                '2' => KeyAction::SelectDifficulty(Difficulty::Medium),
                '3' => KeyAction::SelectDifficulty(Difficulty::Fast),
                't' => KeyAction::CycleTheme,
                'm' => KeyAction::ToggleSound,

                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },

            _ => KeyAction::None,
        }
    }
}

fn turn(direction: Direction) -> KeyAction {
    KeyAction::Game(Command::Turn(direction))
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
