//! Random password generator.

use super::form::{render_button, render_value, Focus, Rows, Slider, Toggle};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

pub const MIN_LENGTH: i64 = 4;
pub const MAX_LENGTH: i64 = 32;
pub const DEFAULT_LENGTH: i64 = 12;

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub fn alphabet(numbers: bool, symbols: bool) -> String {
    let mut chars = String::from(LETTERS);
    if numbers {
        chars.push_str(DIGITS);
    }
    if symbols {
        chars.push_str(SYMBOLS);
    }
    chars
}

/// `length` characters drawn uniformly from the alphabet
pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize, numbers: bool, symbols: bool) -> String {
    let chars: Vec<char> = alphabet(numbers, symbols).chars().collect();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

const LENGTH: usize = 0;
const NUMBERS: usize = 1;
const SYMBOLS_TOGGLE: usize = 2;
const GENERATE: usize = 3;

pub struct PasswordTool {
    length: Slider,
    numbers: Toggle,
    symbols: Toggle,
    password: String,
    focus: Focus,
}

impl PasswordTool {
    pub fn new() -> Self {
        Self {
            length: Slider::new("label_length", DEFAULT_LENGTH, MIN_LENGTH, MAX_LENGTH, 1),
            numbers: Toggle::new("label_numbers", true),
            symbols: Toggle::new("label_symbols", true),
            password: String::new(),
            focus: Focus::new(4),
        }
    }

    fn regenerate(&mut self) {
        self.password = generate(
            &mut rand::thread_rng(),
            self.length.value as usize,
            self.numbers.value,
            self.symbols.value,
        );
    }
}

impl Tool for PasswordTool {
    fn view(&self) -> ViewState {
        ViewState::Password
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match self.focus.index() {
            LENGTH => self.length.handle_key(&key),
            NUMBERS => self.numbers.handle_key(&key),
            SYMBOLS_TOGGLE => self.symbols.handle_key(&key),
            GENERATE if key.code == KeyCode::Enter => {
                self.regenerate();
                true
            }
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn height(&self, _width: u16) -> u16 {
        7
    }

    fn focus_row(&self) -> u16 {
        match self.focus.index() {
            GENERATE => 4,
            index => index as u16,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.length.render(
            rows.take(1),
            buf,
            self.focus.is(LENGTH),
            &self.length.value.to_string(),
            ui,
        );
        self.numbers.render(rows.take(1), buf, self.focus.is(NUMBERS), ui);
        self.symbols.render(rows.take(1), buf, self.focus.is(SYMBOLS_TOGGLE), ui);
        rows.skip(1);
        render_button(rows.take(1), buf, ui.tr.t("generate"), self.focus.is(GENERATE), ui);
        rows.skip(1);

        let (text, style) = if self.password.is_empty() {
            (
                ui.tr.t("password_placeholder").to_string(),
                Style::default().fg(ui.theme.text_disabled),
            )
        } else {
            (
                self.password.clone(),
                Style::default()
                    .fg(ui.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
        };
        render_value(rows.take(1), buf, "", &text, style, ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        if self.password.is_empty() {
            return None;
        }
        Some(Download::text("password.txt", self.password.clone()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.password.clone()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_alphabet_options() {
        assert_eq!(alphabet(false, false).len(), 52);
        assert_eq!(alphabet(true, false).len(), 62);
        assert_eq!(alphabet(true, true).len(), 62 + SYMBOLS.len());
    }

    #[test]
    fn test_generate_uses_only_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate(&mut rng, 32, false, false);
        assert_eq!(password.chars().count(), 32);
        assert!(password.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_download_only_after_generate() {
        let (ctx, _rx) = context(ViewState::Password);
        let mut tool = PasswordTool::new();
        assert!(tool.download(tr()).is_none());

        for _ in 0..3 {
            tool.handle_key(key(KeyCode::Tab), &ctx);
        }
        tool.handle_key(key(KeyCode::Enter), &ctx);
        let download = tool.download(tr()).unwrap();
        assert_eq!(download.filename, "password.txt");
        assert_eq!(download.contents.len(), DEFAULT_LENGTH as usize);
    }

    #[test]
    fn test_slider_bounds_length() {
        let (ctx, _rx) = context(ViewState::Password);
        let mut tool = PasswordTool::new();
        for _ in 0..40 {
            tool.handle_key(key(KeyCode::Right), &ctx);
        }
        assert_eq!(tool.length.value, MAX_LENGTH);
        assert_eq!(tool.handle_key(key(KeyCode::Esc), &ctx), InputResult::Close);
    }
}
