//! Word and character counter.

use super::form::{render_value, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub words: usize,
    pub chars: usize,
}

pub fn count(text: &str) -> TextStats {
    TextStats {
        words: text.split_whitespace().count(),
        chars: text.chars().count(),
    }
}

pub fn report(text: &str) -> String {
    let stats = count(text);
    format!(
        "Report\nWords: {}\nCharacters: {}\n\n{}",
        stats.words, stats.chars, text
    )
}

const INPUT_HEIGHT: u16 = 8;

pub struct WordCounterTool {
    input: TextField,
}

impl WordCounterTool {
    pub fn new() -> Self {
        Self {
            input: TextField::multiline("label_text", ""),
        }
    }
}

impl Tool for WordCounterTool {
    fn view(&self) -> ViewState {
        ViewState::WordCounter
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        InputResult::handled(self.input.input(key))
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        self.input.paste(text);
    }

    fn height(&self, _width: u16) -> u16 {
        INPUT_HEIGHT + 3
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.input.render(rows.take(INPUT_HEIGHT), buf, true, ui);
        rows.skip(1);
        let stats = count(&self.input.text());
        let style = Style::default()
            .fg(ui.theme.primary)
            .add_modifier(Modifier::BOLD);
        render_value(rows.take(1), buf, ui.tr.t("label_words"), &stats.words.to_string(), style, ui);
        render_value(rows.take(1), buf, ui.tr.t("label_characters"), &stats.chars.to_string(), style, ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("word-count-report.txt", report(&self.input.text())))
    }

    fn clipboard_text(&self) -> Option<String> {
        let stats = count(&self.input.text());
        Some(format!("Words: {}\nCharacters: {}", stats.words, stats.chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_count() {
        assert_eq!(count(""), TextStats { words: 0, chars: 0 });
        assert_eq!(count("   \n\t"), TextStats { words: 0, chars: 5 });
        assert_eq!(count(" hello   big\nworld "), TextStats { words: 3, chars: 19 });
        assert_eq!(count("héllo"), TextStats { words: 1, chars: 5 });
    }

    #[test]
    fn test_report_format() {
        assert_eq!(report("a b"), "Report\nWords: 2\nCharacters: 3\n\na b");
    }

    #[test]
    fn test_typing_updates_download() {
        let (ctx, _rx) = context(ViewState::WordCounter);
        let mut tool = WordCounterTool::new();
        type_text(&mut tool, &ctx, "one two");
        let download = tool.download(tr()).unwrap();
        assert_eq!(download.filename, "word-count-report.txt");
        assert!(String::from_utf8(download.contents).unwrap().starts_with("Report\nWords: 2\n"));
    }
}
