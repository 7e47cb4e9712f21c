//! Side-by-side string comparison.

use super::form::{put, Focus, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Match,
    /// Strings differ; absolute difference in character count
    Differ { length_diff: usize },
}

pub fn compare(a: &str, b: &str) -> Comparison {
    if a == b {
        Comparison::Match
    } else {
        Comparison::Differ {
            length_diff: a.chars().count().abs_diff(b.chars().count()),
        }
    }
}

const FIELD_HEIGHT: u16 = 6;

pub struct StringCompareTool {
    fields: [TextField; 2],
    focus: Focus,
}

impl StringCompareTool {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::multiline("label_text_a", "").with_placeholder("Text 1..."),
                TextField::multiline("label_text_b", "").with_placeholder("Text 2..."),
            ],
            focus: Focus::new(2),
        }
    }

    fn result(&self) -> Comparison {
        compare(&self.fields[0].text(), &self.fields[1].text())
    }

    /// Fields side by side when wide enough, else stacked
    fn side_by_side(width: u16) -> bool {
        width >= 60
    }
}

impl Tool for StringCompareTool {
    fn view(&self) -> ViewState {
        ViewState::StringCompare
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        InputResult::handled(self.fields[self.focus.index()].input(key))
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        self.fields[self.focus.index()].paste(text);
    }

    fn height(&self, width: u16) -> u16 {
        let fields = if Self::side_by_side(width) {
            FIELD_HEIGHT
        } else {
            FIELD_HEIGHT * 2
        };
        fields + 3
    }

    fn focus_row(&self) -> u16 {
        self.focus.index() as u16 * FIELD_HEIGHT
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        if Self::side_by_side(area.width) {
            let row = rows.take(FIELD_HEIGHT);
            let half = row.width / 2;
            let left = Rect::new(row.x, row.y, half, row.height);
            let right = Rect::new(row.x + half + 1, row.y, row.width - half - 1, row.height);
            self.fields[0].render(left, buf, self.focus.is(0), ui);
            self.fields[1].render(right, buf, self.focus.is(1), ui);
        } else {
            let focus = self.focus;
            for (i, field) in self.fields.iter_mut().enumerate() {
                field.render(rows.take(FIELD_HEIGHT), buf, focus.is(i), ui);
            }
        }
        rows.skip(1);

        let (line, color) = match self.result() {
            Comparison::Match => (format!("✔ {}", ui.tr.t("strings_match")), ui.theme.status_success),
            Comparison::Differ { length_diff } => (
                format!(
                    "✘ {}  ({})",
                    ui.tr.t("strings_differ"),
                    ui.tr.fmt("strings_diff_chars", &[("count", &length_diff.to_string())])
                ),
                ui.theme.status_error,
            ),
        };
        let row = rows.take(1);
        put(
            buf,
            row.x,
            row.y,
            &line,
            row.width,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        let matched = self.result() == Comparison::Match;
        Some(Download::text("comparison.txt", format!("Match: {}", matched)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_compare() {
        assert_eq!(compare("", ""), Comparison::Match);
        assert_eq!(compare("abc", "abc"), Comparison::Match);
        assert_eq!(compare("abc", "abd"), Comparison::Differ { length_diff: 0 });
        assert_eq!(compare("a", "abcd"), Comparison::Differ { length_diff: 3 });
    }

    #[test]
    fn test_download_reports_match() {
        let (ctx, _rx) = context(ViewState::StringCompare);
        let mut tool = StringCompareTool::new();
        assert_eq!(tool.download(tr()).unwrap().contents, b"Match: true");
        type_text(&mut tool, &ctx, "x");
        assert_eq!(tool.download(tr()).unwrap().contents, b"Match: false");
        tool.handle_key(key(KeyCode::Tab), &ctx);
        type_text(&mut tool, &ctx, "x");
        assert_eq!(tool.result(), Comparison::Match);
    }
}
