//! Discount calculator.

use super::form::{render_value, Focus, Rows, TextField};
use super::number::parse_leading_float;
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountResult {
    pub price: f64,
    pub discount: f64,
    pub saving: f64,
    pub final_price: f64,
}

/// Fields that do not parse count as zero
pub fn calculate(price: &str, discount: &str) -> DiscountResult {
    let price = parse_leading_float(price).unwrap_or(0.0);
    let discount = parse_leading_float(discount).unwrap_or(0.0);
    let saving = price * (discount / 100.0);
    DiscountResult {
        price,
        discount,
        saving,
        final_price: price - saving,
    }
}

const PRICE: usize = 0;
const DISCOUNT: usize = 1;

pub struct DiscountTool {
    fields: [TextField; 2],
    focus: Focus,
}

impl DiscountTool {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::single("label_price", ""),
                TextField::single("label_discount", ""),
            ],
            focus: Focus::new(2),
        }
    }

    fn result(&self) -> DiscountResult {
        calculate(&self.fields[PRICE].text(), &self.fields[DISCOUNT].text())
    }
}

impl Tool for DiscountTool {
    fn view(&self) -> ViewState {
        ViewState::Discount
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

    fn height(&self, _width: u16) -> u16 {
        5
    }

    fn focus_row(&self) -> u16 {
        self.focus.index() as u16
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let focus = self.focus;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.render(rows.take(1), buf, focus.is(i), ui);
        }
        rows.skip(1);

        let result = self.result();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        render_value(
            rows.take(1),
            buf,
            ui.tr.t("label_final_price"),
            &format!("{:.2}", result.final_price),
            bold.fg(ui.theme.status_success),
            ui,
        );
        render_value(
            rows.take(1),
            buf,
            ui.tr.t("label_you_save"),
            &format!("{:.2}", result.saving),
            bold.fg(ui.theme.status_error),
            ui,
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        let result = self.result();
        Some(Download::text(
            "discount.txt",
            format!(
                "Price: {}\nDiscount: {}%\nFinal: {:.2}",
                result.price, result.discount, result.final_price
            ),
        ))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(format!("{:.2}", self.result().final_price))
    }
}
