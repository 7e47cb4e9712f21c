//! Reading progress demo: enough text to scroll the page and watch the
//! progress bar in the header fill up.

use super::form::wrapped_lines;
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget, Wrap},
};

pub const PARAGRAPHS: u16 = 10;

pub struct ReadingProgressTool {
    /// Sample sentence in the active language
    sample: String,
}

impl ReadingProgressTool {
    pub fn new(tr: Tr) -> Self {
        Self {
            sample: tr.t("progress_sample").to_string(),
        }
    }

    /// One paragraph: the sample sentence four times
    fn paragraph(&self) -> String {
        vec![self.sample.as_str(); 4].join(" ")
    }
}

impl Tool for ReadingProgressTool {
    fn view(&self) -> ViewState {
        ViewState::ReadingProgress
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        match key.code {
            KeyCode::Esc => InputResult::close(),
            _ => InputResult::Ignored,
        }
    }

    fn language_changed(&mut self, tr: Tr) {
        self.sample = tr.t("progress_sample").to_string();
    }

    fn height(&self, width: u16) -> u16 {
        (wrapped_lines(&self.paragraph(), width) + 1).saturating_mul(PARAGRAPHS)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let text = self.paragraph();
        let style = Style::default().fg(ui.theme.text_secondary);
        let mut y = area.y;
        for _ in 0..PARAGRAPHS {
            let height = wrapped_lines(&text, area.width) + 1;
            if y >= area.bottom() {
                break;
            }
            let rect = Rect::new(area.x, y, area.width, height.min(area.bottom() - y));
            Paragraph::new(text.as_str())
                .style(style)
                .wrap(Wrap { trim: true })
                .render(rect, buf);
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::tools::testing::*;

    #[test]
    fn test_height_grows_when_narrow() {
        let tool = ReadingProgressTool::new(tr());
        assert!(tool.height(30) > tool.height(120));
        assert!(tool.height(120) >= PARAGRAPHS * 2);
    }

    #[test]
    fn test_keys() {
        let (ctx, _rx) = context(ViewState::ReadingProgress);
        let mut tool = ReadingProgressTool::new(tr());
        assert_eq!(tool.handle_key(key(KeyCode::Down), &ctx), InputResult::Ignored);
        assert_eq!(tool.handle_key(key(KeyCode::Esc), &ctx), InputResult::Close);
        assert!(render_text(&mut tool, 40).contains("Sample"));
    }

    #[test]
    fn test_height_is_stable_across_renders() {
        let mut tool = ReadingProgressTool::new(tr());
        let before = tool.height(60);
        render_text(&mut tool, 60);
        assert_eq!(tool.height(60), before);
    }

    #[test]
    fn test_language_change_swaps_sample() {
        let mut tool = ReadingProgressTool::new(tr());
        let english = tool.height(60);
        tool.language_changed(Tr::new(Language::Ar));
        assert!(tool.paragraph().starts_with("هذا"));
        assert_ne!(tool.height(60), english);
    }
}
