use tui::style::{Color, Modifier, Style};

use crate::models::Theme;

/// Colours of the signed-in account's theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                accent: Color::Cyan,
                muted: Color::Gray,
            },
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                accent: Color::Blue,
                muted: Color::DarkGray,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_theme_uses_dark_text() {
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(palette.base().fg, Some(Color::Black));
        assert_eq!(palette.base().bg, Some(Color::White));
    }
}
