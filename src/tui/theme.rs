// Theme system for the TUI
//
// Two built-in color themes, selected by the `theme` config value.

use ratatui::style::Color;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Resolve a config value to a theme; unknown names fall back to Dark
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

/// Complete theme definition for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub border: Color,
    pub title: Color,

    /// Role tag color for the user's turns
    pub user: Color,
    /// Role tag color for assistant turns
    pub assistant: Color,
    /// Busy spinner and in-progress text
    pub busy: Color,
    /// Reasoning panel accents
    pub reasoning: Color,

    /// Dimmed hints, placeholders, empty-state text
    pub muted: Color,
    pub status_bar: Color,

    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            border: Color::DarkGray,
            title: Color::Cyan,
            user: Color::Green,
            assistant: Color::Cyan,
            busy: Color::Yellow,
            reasoning: Color::Magenta,
            muted: Color::DarkGray,
            status_bar: Color::Blue,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            border: Color::Gray,
            title: Color::Blue,
            user: Color::Green,
            assistant: Color::Blue,
            busy: Color::Magenta,
            reasoning: Color::Magenta,
            muted: Color::Gray,
            status_bar: Color::Blue,
            log_error: Color::Red,
            log_warn: Color::Magenta,
            log_info: Color::Green,
            log_debug: Color::Gray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_resolve() {
        assert_eq!(ThemeKind::from_name("dark"), ThemeKind::Dark);
        assert_eq!(ThemeKind::from_name("Light"), ThemeKind::Light);
        assert_eq!(ThemeKind::from_name("solarized"), ThemeKind::Dark);
    }
}
