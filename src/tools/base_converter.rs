//! Number base converter (2, 8, 10, 16).

use super::form::{render_value, Choice, Focus, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

pub const BASES: [u32; 4] = [2, 8, 10, 16];

/// Parse like a lenient integer reader: leading whitespace and an optional
/// sign are skipped, then the longest run of digits valid in `radix` is read.
/// Base 16 also accepts a `0x` prefix. `None` when no digit is found or the
/// value overflows.
pub fn parse_prefix(input: &str, radix: u32) -> Option<i128> {
    let mut rest = input.trim_start();
    let negative = match rest.chars().next() {
        Some('-') => {
            rest = &rest[1..];
            true
        }
        Some('+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };
    if radix == 16 {
        if let Some(stripped) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            rest = stripped;
        }
    }

    let mut value: i128 = 0;
    let mut digits = 0usize;
    for c in rest.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = value
            .checked_mul(radix as i128)?
            .checked_add(digit as i128)?;
        digits += 1;
    }
    if digits == 0 {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Render `value` in `radix`, uppercase digits
pub fn to_radix(value: i128, radix: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        let digit = (magnitude % radix as u128) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('?').to_ascii_uppercase());
        magnitude /= radix as u128;
    }
    if value < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseResult {
    /// Nothing entered
    Empty,
    Value(String),
    Invalid,
}

pub fn convert(input: &str, from: u32, to: u32) -> BaseResult {
    if input.is_empty() {
        return BaseResult::Empty;
    }
    match parse_prefix(input, from) {
        Some(value) => BaseResult::Value(to_radix(value, to)),
        None => BaseResult::Invalid,
    }
}

const NUMBER: usize = 0;
const FROM: usize = 1;
const TO: usize = 2;

pub struct BaseConverterTool {
    number: TextField,
    from: Choice<u32>,
    to: Choice<u32>,
    focus: Focus,
}

impl BaseConverterTool {
    pub fn new() -> Self {
        let options = || BASES.iter().map(|b| (*b, b.to_string())).collect::<Vec<_>>();
        Self {
            number: TextField::single("label_number", ""),
            from: Choice::new("label_from", options(), 10),
            to: Choice::new("label_to", options(), 2),
            focus: Focus::new(3),
        }
    }

    fn result(&self) -> BaseResult {
        convert(&self.number.text(), self.from.selected(), self.to.selected())
    }

    fn result_text(&self) -> String {
        match self.result() {
            BaseResult::Value(text) => text,
            BaseResult::Empty | BaseResult::Invalid => String::new(),
        }
    }
}

fn base_name_key(base: u32) -> &'static str {
    match base {
        2 => "base_binary",
        8 => "base_octal",
        16 => "base_hex",
        _ => "base_decimal",
    }
}

impl Tool for BaseConverterTool {
    fn view(&self) -> ViewState {
        ViewState::BaseConverter
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match self.focus.index() {
            NUMBER => self.number.input(key),
            FROM => self.from.handle_key(&key),
            TO => self.to.handle_key(&key),
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        if self.focus.is(NUMBER) {
            self.number.paste(text);
        }
    }

    fn height(&self, _width: u16) -> u16 {
        5
    }

    fn focus_row(&self) -> u16 {
        self.focus.index() as u16
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.number.render(rows.take(1), buf, self.focus.is(NUMBER), ui);
        self.from.render(rows.take(1), buf, self.focus.is(FROM), ui);
        self.to.render(rows.take(1), buf, self.focus.is(TO), ui);
        rows.skip(1);

        let (text, style) = match self.result() {
            BaseResult::Empty => (String::new(), Style::default()),
            BaseResult::Invalid => (
                ui.tr.t("invalid").to_string(),
                Style::default().fg(ui.theme.status_error),
            ),
            BaseResult::Value(value) => (
                value,
                Style::default()
                    .fg(ui.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        render_value(
            rows.take(1),
            buf,
            ui.tr.t(base_name_key(self.to.selected())),
            &text,
            style,
            ui,
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text(
            "base-conversion.txt",
            format!(
                "{} ({}) = {} ({})",
                self.number.text(),
                self.from.selected(),
                self.result_text(),
                self.to.selected()
            ),
        ))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.result_text()).filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_round_trip_all_bases() {
        for n in [0i128, 1, 7, 8, 255, 256, 65535, 1_000_000, i64::MAX as i128] {
            for base in BASES {
                assert_eq!(parse_prefix(&to_radix(n, base), base), Some(n), "{} in base {}", n, base);
            }
        }
    }

    #[test]
    fn test_prefix_semantics() {
        assert_eq!(parse_prefix("  1012", 2), Some(5));
        assert_eq!(parse_prefix("-ff", 16), Some(-255));
        assert_eq!(parse_prefix("0x1A", 16), Some(26));
        assert_eq!(parse_prefix("9", 8), None);
        assert_eq!(parse_prefix("", 10), None);
        assert_eq!(parse_prefix("12abc", 10), Some(12));
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert("", 10, 2), BaseResult::Empty);
        assert_eq!(convert("10", 10, 2), BaseResult::Value("1010".into()));
        assert_eq!(convert("255", 10, 16), BaseResult::Value("FF".into()));
        assert_eq!(convert("-10", 10, 2), BaseResult::Value("-1010".into()));
        assert_eq!(convert("xyz", 10, 2), BaseResult::Invalid);
    }

    #[test]
    fn test_download_format() {
        let (ctx, _rx) = context(ViewState::BaseConverter);
        let mut tool = BaseConverterTool::new();
        type_text(&mut tool, &ctx, "10");
        assert_eq!(
            tool.download(tr()).unwrap().contents,
            b"10 (10) = 1010 (2)"
        );
    }
}
