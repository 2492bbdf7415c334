// Color palettes for the light and dark themes.

use ratatui::style::{Color, Modifier, Style};

use crate::state::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub active: Color,
    pub selection: Color,
    pub success: Color,
    pub warn: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                active: Color::Yellow,
                selection: Color::DarkGray,
                success: Color::Green,
                warn: Color::Yellow,
                error: Color::Red,
            },
            Theme::Light => Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                active: Color::Magenta,
                selection: Color::Gray,
                success: Color::Green,
                warn: Color::Rgb(180, 110, 0),
                error: Color::Red,
            },
        }
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
