//! Application-wide theme system
//!
//! Two built-in palettes (light and dark) selected by the persisted theme
//! preference. Every widget pulls its colors from `AppTheme` rather than
//! hard-coding them.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Translation key for the mode's display name
    pub fn label_key(self) -> &'static str {
        match self {
            ThemeMode::Light => "theme_light",
            ThemeMode::Dark => "theme_dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete application theme defining all UI colors
#[derive(Debug, Clone)]
pub struct AppTheme {
    pub mode: ThemeMode,

    // Brand
    pub primary: Color,
    pub secondary: Color,

    // Surfaces
    pub background: Color,
    pub surface: Color,
    pub surface_selected: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_disabled: Color,

    // Form
    pub form_label: Color,
    pub form_label_focused: Color,
    pub form_field_background: Color,
    pub form_field_text: Color,
    pub form_checkbox_checked: Color,
    pub form_checkbox_unchecked: Color,

    // Status
    pub status_info: Color,
    pub status_success: Color,
    pub status_warning: Color,
    pub status_error: Color,

    // Buttons
    pub button_normal: Color,
    pub button_focused: Color,
    pub button_text: Color,

    // Reading progress bar
    pub progress_track: Color,
}

impl AppTheme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => ThemePresets::light(),
            ThemeMode::Dark => ThemePresets::dark(),
        }
    }

    /// Blend primary into secondary across `width` cells for the progress bar
    pub fn gradient_at(&self, index: u16, width: u16) -> Color {
        let (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) = (self.primary, self.secondary)
        else {
            return self.primary;
        };
        if width <= 1 {
            return self.primary;
        }
        let t = index as f32 / (width - 1) as f32;
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }
}

/// Built-in theme presets
pub struct ThemePresets;

impl ThemePresets {
    /// Bright theme, the default when nothing else is known
    pub fn light() -> AppTheme {
        AppTheme {
            mode: ThemeMode::Light,

            primary: Color::Rgb(59, 130, 246),   // #3B82F6
            secondary: Color::Rgb(139, 92, 246), // #8B5CF6

            background: Color::Rgb(249, 250, 251),
            surface: Color::Rgb(255, 255, 255),
            surface_selected: Color::Rgb(219, 234, 254),
            border: Color::Rgb(209, 213, 219),
            border_focused: Color::Rgb(59, 130, 246),

            text_primary: Color::Rgb(17, 24, 39),
            text_secondary: Color::Rgb(75, 85, 99),
            text_disabled: Color::Rgb(156, 163, 175),

            form_label: Color::Rgb(55, 65, 81),
            form_label_focused: Color::Rgb(37, 99, 235),
            form_field_background: Color::Rgb(243, 244, 246),
            form_field_text: Color::Rgb(17, 24, 39),
            form_checkbox_checked: Color::Rgb(22, 163, 74),
            form_checkbox_unchecked: Color::Rgb(156, 163, 175),

            status_info: Color::Rgb(37, 99, 235),
            status_success: Color::Rgb(22, 163, 74),
            status_warning: Color::Rgb(234, 88, 12),
            status_error: Color::Rgb(220, 38, 38),

            button_normal: Color::Rgb(59, 130, 246),
            button_focused: Color::Rgb(37, 99, 235),
            button_text: Color::Rgb(255, 255, 255),

            progress_track: Color::Rgb(229, 231, 235),
        }
    }

    /// Dark theme for low-light terminals
    pub fn dark() -> AppTheme {
        AppTheme {
            mode: ThemeMode::Dark,

            primary: Color::Rgb(59, 130, 246),
            secondary: Color::Rgb(139, 92, 246),

            background: Color::Rgb(17, 24, 39),
            surface: Color::Rgb(31, 41, 55),
            surface_selected: Color::Rgb(55, 65, 81),
            border: Color::Rgb(75, 85, 99),
            border_focused: Color::Rgb(96, 165, 250),

            text_primary: Color::Rgb(243, 244, 246),
            text_secondary: Color::Rgb(209, 213, 219),
            text_disabled: Color::Rgb(107, 114, 128),

            form_label: Color::Rgb(209, 213, 219),
            form_label_focused: Color::Rgb(250, 204, 21),
            form_field_background: Color::Rgb(55, 65, 81),
            form_field_text: Color::Rgb(255, 255, 255),
            form_checkbox_checked: Color::Rgb(74, 222, 128),
            form_checkbox_unchecked: Color::Rgb(107, 114, 128),

            status_info: Color::Rgb(96, 165, 250),
            status_success: Color::Rgb(74, 222, 128),
            status_warning: Color::Rgb(251, 146, 60),
            status_error: Color::Rgb(248, 113, 113),

            button_normal: Color::Rgb(59, 130, 246),
            button_focused: Color::Rgb(96, 165, 250),
            button_text: Color::Rgb(255, 255, 255),

            progress_track: Color::Rgb(31, 41, 55),
        }
    }
}

/// Parse a `#RRGGBB` string into a terminal color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_parse_and_toggle() {
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse(" Light "), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::parse("sepia"), None);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_presets_match_mode() {
        assert_eq!(AppTheme::for_mode(ThemeMode::Dark).mode, ThemeMode::Dark);
        assert_eq!(AppTheme::for_mode(ThemeMode::Light).mode, ThemeMode::Light);
    }

    #[test]
    fn test_gradient_endpoints() {
        let theme = ThemePresets::light();
        assert_eq!(theme.gradient_at(0, 10), theme.primary);
        assert_eq!(theme.gradient_at(9, 10), theme.secondary);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#3B82F6"), Some(Color::Rgb(59, 130, 246)));
        assert_eq!(parse_hex_color("ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }
}
