//! Random color picker with a swatch preview.

use super::form::{put, render_button, Rows};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::theme::parse_hex_color;
use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Uniform 24-bit color as `#RRGGBB`
pub fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06X}", rng.gen_range(0..=0xFF_FFFFu32))
}

/// Fill `area` with a solid swatch of `hex`
pub fn render_swatch(area: Rect, buf: &mut Buffer, hex: &str) {
    let Some(color) = parse_hex_color(hex) else {
        return;
    };
    let style = Style::default().bg(color);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(" ").set_style(style);
            }
        }
    }
}

const SWATCH_HEIGHT: u16 = 4;
const SWATCH_WIDTH: u16 = 16;

pub struct RandomColorTool {
    color: String,
}

impl RandomColorTool {
    pub fn new() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Tool for RandomColorTool {
    fn view(&self) -> ViewState {
        ViewState::RandomColor
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        match key.code {
            KeyCode::Esc => InputResult::close(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.color = random_hex(&mut rand::thread_rng());
                InputResult::Continue
            }
            _ => InputResult::Ignored,
        }
    }

    fn height(&self, _width: u16) -> u16 {
        SWATCH_HEIGHT + 4
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let swatch = rows.take(SWATCH_HEIGHT);
        render_swatch(
            Rect::new(swatch.x, swatch.y, SWATCH_WIDTH.min(swatch.width), swatch.height),
            buf,
            &self.color,
        );
        rows.skip(1);
        let row = rows.take(1);
        put(
            buf,
            row.x,
            row.y,
            &self.color,
            row.width,
            Style::default()
                .fg(ui.theme.text_primary)
                .add_modifier(Modifier::BOLD),
        );
        rows.skip(1);
        render_button(rows.take(1), buf, ui.tr.t("generate"), true, ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("color.txt", self.color.clone()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.color.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn test_random_hex_format() {
        let re = Regex::new("^#[0-9A-F]{6}$").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(re.is_match(&random_hex(&mut rng)));
        }
    }

    #[test]
    fn test_default_and_generate() {
        let (ctx, _rx) = context(ViewState::RandomColor);
        let mut tool = RandomColorTool::new();
        assert_eq!(tool.clipboard_text().as_deref(), Some(DEFAULT_COLOR));
        tool.handle_key(key(KeyCode::Enter), &ctx);
        assert_eq!(tool.color.len(), 7);
        assert!(tool.color.starts_with('#'));
    }
}
