//! Theme and styling configuration.
//!
//! Two palettes exist, one per terminal background. The active one is a
//! process-wide setting so render code can call [`theme`] without threading
//! it through every widget.

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Which palette to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

/// Color theme for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Muted text (placeholders, hints).
    pub muted: Color,
    /// Accent for focus and selection.
    pub accent: Color,
    /// Border of unfocused widgets.
    pub border: Color,
    /// Border of the focused widget.
    pub border_focused: Color,
    /// Issue keys in the list.
    pub issue_key: Color,
    /// Errors.
    pub error: Color,
    /// Background of popups drawn over the issue list.
    pub popup_bg: Color,
    /// Text on top of an accent-colored highlight.
    pub selection_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            issue_key: Color::LightBlue,
            error: Color::Red,
            popup_bg: Color::Black,
            selection_fg: Color::Black,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Magenta,
            issue_key: Color::Blue,
            error: Color::Red,
            popup_bg: Color::White,
            selection_fg: Color::White,
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static LIGHT: AtomicBool = AtomicBool::new(false);

/// Switch the active palette.
pub fn set_mode(mode: ThemeMode) {
    LIGHT.store(mode == ThemeMode::Light, Ordering::Relaxed);
}

/// The active palette's mode.
pub fn mode() -> ThemeMode {
    if LIGHT.load(Ordering::Relaxed) {
        ThemeMode::Light
    } else {
        ThemeMode::Dark
    }
}

/// The active theme.
pub fn theme() -> Theme {
    Theme::for_mode(mode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled().toggled(), ThemeMode::Light);
    }

    #[test]
    fn test_palettes_differ_in_foreground() {
        let dark = Theme::for_mode(ThemeMode::Dark);
        let light = Theme::for_mode(ThemeMode::Light);
        assert_eq!(dark, Theme::default());
        assert_eq!(light.fg, Color::Black);
        assert_ne!(dark.fg, light.fg);
        assert_ne!(light.popup_bg, light.fg);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
        assert_eq!(ThemeMode::Light.as_str(), "light");
    }
}
