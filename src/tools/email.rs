//! Email address format check.

use super::form::{put, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use regex::Regex;
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    /// Nothing typed yet
    Idle,
    Valid,
    Invalid,
}

impl EmailStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmailStatus::Idle => "idle",
            EmailStatus::Valid => "valid",
            EmailStatus::Invalid => "invalid",
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"))
        .is_match(email)
}

pub fn check(email: &str) -> EmailStatus {
    if email.is_empty() {
        EmailStatus::Idle
    } else if is_valid_email(email) {
        EmailStatus::Valid
    } else {
        EmailStatus::Invalid
    }
}

pub struct EmailTool {
    input: TextField,
}

impl EmailTool {
    pub fn new() -> Self {
        Self {
            input: TextField::single("label_email", "").with_placeholder("example@domain.com"),
        }
    }

    fn status(&self) -> EmailStatus {
        check(&self.input.text())
    }
}

impl Tool for EmailTool {
    fn view(&self) -> ViewState {
        ViewState::Email
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
        3
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.input.render(rows.take(1), buf, true, ui);
        rows.skip(1);
        let (text, color) = match self.status() {
            EmailStatus::Idle => return,
            EmailStatus::Valid => (format!("✔ {}", ui.tr.t("email_valid")), ui.theme.status_success),
            EmailStatus::Invalid => (format!("✘ {}", ui.tr.t("email_invalid")), ui.theme.status_error),
        };
        let row = rows.take(1);
        put(
            buf,
            row.x,
            row.y,
            &text,
            row.width,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text(
            "email-check.txt",
            format!("Email: {}\nResult: {}", self.input.text(), self.status().as_str()),
        ))
    }
}
