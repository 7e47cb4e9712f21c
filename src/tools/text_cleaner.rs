//! Whitespace and blank-line cleanup.

use super::form::{render_button, Focus, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect};
use regex::Regex;
use std::sync::OnceLock;

/// Collapse every whitespace run (newlines included) to one space and trim
pub fn clean_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop lines that contain only whitespace
pub fn clean_lines(text: &str) -> String {
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();
    let re = BLANK_LINE.get_or_init(|| Regex::new(r"(?m)^\s*[\r\n]").expect("valid blank line regex"));
    re.replace_all(text, "").into_owned()
}

const INPUT: usize = 0;
const SPACES: usize = 1;
const LINES: usize = 2;
const INPUT_HEIGHT: u16 = 10;

pub struct TextCleanerTool {
    input: TextField,
    focus: Focus,
}

impl TextCleanerTool {
    pub fn new() -> Self {
        Self {
            input: TextField::multiline("label_text", ""),
            focus: Focus::new(3),
        }
    }

    fn apply(&mut self, clean: fn(&str) -> String) {
        let cleaned = clean(&self.input.text());
        self.input.set_text(&cleaned);
    }
}

impl Tool for TextCleanerTool {
    fn view(&self) -> ViewState {
        ViewState::TextCleaner
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match (self.focus.index(), key.code) {
            (INPUT, _) => self.input.input(key),
            (SPACES, KeyCode::Enter) => {
                self.apply(clean_spaces);
                true
            }
            (LINES, KeyCode::Enter) => {
                self.apply(clean_lines);
                true
            }
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        self.input.paste(text);
        self.focus.set(INPUT);
    }

    fn height(&self, _width: u16) -> u16 {
        INPUT_HEIGHT + 2
    }

    fn focus_row(&self) -> u16 {
        if self.focus.is(INPUT) {
            0
        } else {
            INPUT_HEIGHT + 1
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.input.render(rows.take(INPUT_HEIGHT), buf, self.focus.is(INPUT), ui);
        rows.skip(1);
        let row = rows.take(1);
        let used = render_button(row, buf, ui.tr.t("clean_spaces"), self.focus.is(SPACES), ui);
        let rest = Rect::new(
            row.x + used + 2,
            row.y,
            row.width.saturating_sub(used + 2),
            row.height,
        );
        render_button(rest, buf, ui.tr.t("clean_lines"), self.focus.is(LINES), ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("clean.txt", self.input.text()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.input.text())
    }
}
