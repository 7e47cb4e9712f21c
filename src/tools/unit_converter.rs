//! Data size converter (B, KB, MB, GB, TB with 1024 steps).

use super::form::{render_value, Choice, Focus, Rows, TextField};
use super::number::{format_grouped, parse_leading_float};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

/// Shown when the value does not parse
pub const NO_RESULT: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    B,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::B, Unit::KB, Unit::MB, Unit::GB, Unit::TB];

    pub fn label(self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Bytes per unit
    pub fn factor(self) -> f64 {
        let exponent = Unit::ALL.iter().position(|u| *u == self).unwrap_or(0) as i32;
        1024f64.powi(exponent)
    }
}

pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    value * from.factor() / to.factor()
}

/// Formatted result for raw input, or `---`
pub fn convert_text(input: &str, from: Unit, to: Unit) -> String {
    match parse_leading_float(input) {
        Some(value) => format_grouped(convert(value, from, to), 6),
        None => NO_RESULT.to_string(),
    }
}

const VALUE: usize = 0;
const FROM: usize = 1;
const TO: usize = 2;

pub struct UnitConverterTool {
    value: TextField,
    from: Choice<Unit>,
    to: Choice<Unit>,
    focus: Focus,
}

impl UnitConverterTool {
    pub fn new() -> Self {
        let options = || {
            Unit::ALL
                .iter()
                .map(|u| (*u, u.label().to_string()))
                .collect::<Vec<_>>()
        };
        Self {
            value: TextField::single("label_value", ""),
            from: Choice::new("label_from", options(), Unit::MB),
            to: Choice::new("label_to", options(), Unit::KB),
            focus: Focus::new(3),
        }
    }

    fn result(&self) -> String {
        convert_text(&self.value.text(), self.from.selected(), self.to.selected())
    }
}

impl Tool for UnitConverterTool {
    fn view(&self) -> ViewState {
        ViewState::UnitConverter
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match self.focus.index() {
            VALUE => self.value.input(key),
            FROM => self.from.handle_key(&key),
            TO => self.to.handle_key(&key),
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        if self.focus.is(VALUE) {
            self.value.paste(text);
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
        self.value.render(rows.take(1), buf, self.focus.is(VALUE), ui);
        self.from.render(rows.take(1), buf, self.focus.is(FROM), ui);
        self.to.render(rows.take(1), buf, self.focus.is(TO), ui);
        rows.skip(1);
        let result = format!("{} {}", self.result(), self.to.selected().label());
        render_value(
            rows.take(1),
            buf,
            ui.tr.t("label_result"),
            &result,
            Style::default()
                .fg(ui.theme.primary)
                .add_modifier(Modifier::BOLD),
            ui,
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text(
            "conversion.txt",
            format!(
                "{} {} = {} {}",
                self.value.text(),
                self.from.selected().label(),
                self.result(),
                self.to.selected().label()
            ),
        ))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.result()).filter(|r| r != NO_RESULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_round_trip_all_pairs() {
        for value in [0.0, 1.0, 3.5, 1536.0, 123456.789] {
            for from in Unit::ALL {
                for to in Unit::ALL {
                    let back = convert(convert(value, from, to), to, from);
                    assert!((back - value).abs() <= 1e-9 * value.max(1.0), "{:?}->{:?}", from, to);
                }
            }
        }
    }

    #[test]
    fn test_convert_text() {
        assert_eq!(convert_text("1", Unit::MB, Unit::KB), "1,024");
        assert_eq!(convert_text("1", Unit::KB, Unit::MB), "0.000977");
        assert_eq!(convert_text("2048", Unit::B, Unit::KB), "2");
        assert_eq!(convert_text("abc", Unit::MB, Unit::KB), NO_RESULT);
        assert_eq!(convert_text("", Unit::MB, Unit::KB), NO_RESULT);
    }

    #[test]
    fn test_defaults_and_download() {
        let (ctx, _rx) = context(ViewState::UnitConverter);
        let mut tool = UnitConverterTool::new();
        type_text(&mut tool, &ctx, "2");
        let download = tool.download(tr()).unwrap();
        assert_eq!(download.filename, "conversion.txt");
        assert_eq!(download.contents, b"2 MB = 2,048 KB");
    }
}
