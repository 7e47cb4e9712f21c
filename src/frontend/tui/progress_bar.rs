//! Reading progress bar pinned to the top row of the screen.
//!
//! The filled part is drawn with the theme's primary to secondary gradient,
//! the rest with the track color.

use crate::theme::AppTheme;
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

pub struct ProgressBar {
    percent: f64,
}

impl ProgressBar {
    /// `percent` is clamped to 0..=100
    pub fn new(percent: f64) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
        }
    }

    /// Cells filled out of `width`
    pub fn filled(&self, width: u16) -> u16 {
        ((self.percent / 100.0) * width as f64).round() as u16
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &AppTheme) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let filled = self.filled(area.width);
        for col in 0..area.width {
            let Some(cell) = buf.cell_mut((area.x + col, area.y)) else {
                continue;
            };
            if col < filled {
                cell.set_symbol("▀")
                    .set_style(Style::default().fg(theme.gradient_at(col, area.width)).bg(theme.background));
            } else {
                cell.set_symbol("▀")
                    .set_style(Style::default().fg(theme.progress_track).bg(theme.background));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;

    #[test]
    fn test_fill_width() {
        assert_eq!(ProgressBar::new(0.0).filled(80), 0);
        assert_eq!(ProgressBar::new(50.0).filled(80), 40);
        assert_eq!(ProgressBar::new(100.0).filled(80), 80);
        assert_eq!(ProgressBar::new(250.0).filled(80), 80);
    }

    #[test]
    fn test_render_colors_filled_cells() {
        let theme = AppTheme::for_mode(ThemeMode::Light);
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(50.0).render(area, &mut buf, &theme);
        assert_eq!(buf.cell((0, 0)).unwrap().fg, theme.gradient_at(0, 10));
        assert_eq!(buf.cell((9, 0)).unwrap().fg, theme.progress_track);
    }
}
