use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Theme {
    #[default]
    Default,
    Blue,
    Green,
    Red,
}

/// Colours used to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub food: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub overlay: Color,
    pub overlay_text: Color,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Blue, Theme::Green, Theme::Red];

    /// The theme after this one, wrapping around
    pub fn next(&self) -> Theme {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Red => "Red",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Self::Default => Palette {
                background: Color::Rgb(0xFF, 0xFF, 0xFF),
                grid: Color::Rgb(0xEE, 0xEE, 0xEE),
                food: Color::Rgb(0xFF, 0x00, 0x00),
                snake_head: Color::Rgb(0x00, 0x64, 0x00),
                snake_body: Color::Rgb(0x90, 0xEE, 0x90),
                overlay: Color::Rgb(0x00, 0x00, 0x00),
                overlay_text: Color::Rgb(0xFF, 0xFF, 0xFF),
            },
            Self::Blue => Palette {
                background: Color::Rgb(0xE0, 0xF7, 0xFA),
                grid: Color::Rgb(0xB2, 0xEB, 0xF2),
                food: Color::Rgb(0xFF, 0x8A, 0x65),
                snake_head: Color::Rgb(0x02, 0x77, 0xBD),
                snake_body: Color::Rgb(0x4F, 0xC3, 0xF7),
                overlay: Color::Rgb(0x01, 0x57, 0x9B),
                overlay_text: Color::Rgb(0xE1, 0xF5, 0xFE),
            },
            Self::Green => Palette {
                background: Color::Rgb(0xE8, 0xF5, 0xE9),
                grid: Color::Rgb(0xC8, 0xE6, 0xC9),
                food: Color::Rgb(0xFF, 0xB7, 0x4D),
                snake_head: Color::Rgb(0x2E, 0x7D, 0x32),
                snake_body: Color::Rgb(0x81, 0xC7, 0x84),
                overlay: Color::Rgb(0x1B, 0x5E, 0x20),
                overlay_text: Color::Rgb(0xE8, 0xF5, 0xE9),
            },
            Self::Red => Palette {
                background: Color::Rgb(0xFF, 0xEB, 0xEE),
                grid: Color::Rgb(0xFF, 0xCD, 0xD2),
                food: Color::Rgb(0xAE, 0xD5, 0x81),
                snake_head: Color::Rgb(0xB7, 0x1C, 0x1C),
                snake_body: Color::Rgb(0xEF, 0x53, 0x50),
                overlay: Color::Rgb(0x7F, 0x00, 0x00),
                overlay_text: Color::Rgb(0xFF, 0xEB, 0xEE),
            },
        }
    }
}
