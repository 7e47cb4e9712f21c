//! Body mass index calculator.

use super::form::{put, render_button, render_value, Focus, Rows, TextField};
use super::number::parse_leading_float;
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn of(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "bmi_underweight",
            BmiCategory::Normal => "bmi_normal",
            BmiCategory::Overweight => "bmi_overweight",
            BmiCategory::Obese => "bmi_obese",
        }
    }
}

/// BMI rounded to one decimal; `None` if either input is missing or zero
pub fn calculate(height_cm: &str, weight_kg: &str) -> Option<f64> {
    let weight = parse_leading_float(weight_kg).filter(|w| *w != 0.0)?;
    let height = parse_leading_float(height_cm).filter(|h| *h != 0.0)? / 100.0;
    format!("{:.1}", weight / (height * height)).parse().ok()
}

const HEIGHT: usize = 0;
const WEIGHT: usize = 1;
const CALCULATE: usize = 2;

pub struct BmiTool {
    fields: [TextField; 2],
    bmi: Option<f64>,
    focus: Focus,
}

impl BmiTool {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::single("label_height", ""),
                TextField::single("label_weight", ""),
            ],
            bmi: None,
            focus: Focus::new(3),
        }
    }

    /// Keeps the previous result when inputs are incomplete
    fn recalculate(&mut self) {
        if let Some(bmi) = calculate(&self.fields[HEIGHT].text(), &self.fields[WEIGHT].text()) {
            self.bmi = Some(bmi);
        }
    }
}

impl Tool for BmiTool {
    fn view(&self) -> ViewState {
        ViewState::Bmi
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match (self.focus.index(), key.code) {
            (CALCULATE, KeyCode::Enter) => {
                self.recalculate();
                true
            }
            (CALCULATE, _) => false,
            (index, _) => self.fields[index].input(key),
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        if let Some(field) = self.fields.get_mut(self.focus.index()) {
            field.paste(text);
        }
    }

    fn height(&self, _width: u16) -> u16 {
        7
    }

    fn focus_row(&self) -> u16 {
        match self.focus.index() {
            CALCULATE => 3,
            index => index as u16,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let focus = self.focus;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.render(rows.take(1), buf, focus.is(i), ui);
        }
        rows.skip(1);
        render_button(rows.take(1), buf, ui.tr.t("calculate"), focus.is(CALCULATE), ui);
        rows.skip(1);

        let Some(bmi) = self.bmi else {
            return;
        };
        let row = rows.take(1);
        render_value(
            row,
            buf,
            ui.tr.t("label_bmi"),
            &bmi.to_string(),
            Style::default()
                .fg(ui.theme.primary)
                .add_modifier(Modifier::BOLD),
            ui,
        );
        let category = ui.tr.t(BmiCategory::of(bmi).label_key());
        let offset = super::form::LABEL_WIDTH + bmi.to_string().len() as u16 + 2;
        if row.width > offset {
            put(
                buf,
                row.x + offset,
                row.y,
                &format!("({})", category),
                row.width - offset,
                Style::default().fg(ui.theme.text_secondary),
            );
        }
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        self.bmi
            .map(|bmi| Download::text("bmi.txt", format!("BMI: {}", bmi)))
    }

    fn clipboard_text(&self) -> Option<String> {
        self.bmi.map(|bmi| bmi.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_reference_value() {
        assert_eq!(calculate("175", "70"), Some(22.9));
        assert_eq!(BmiCategory::of(22.9), BmiCategory::Normal);
    }

    #[test]
    fn test_missing_or_zero_inputs() {
        assert_eq!(calculate("", "70"), None);
        assert_eq!(calculate("175", "0"), None);
        assert_eq!(calculate("abc", "70"), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(BmiCategory::of(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::of(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::of(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_calculate_button_keeps_previous_result() {
        let (ctx, _rx) = context(ViewState::Bmi);
        let mut tool = BmiTool::new();
        type_text(&mut tool, &ctx, "175");
        tool.handle_key(key(KeyCode::Tab), &ctx);
        type_text(&mut tool, &ctx, "70");
        tool.handle_key(key(KeyCode::Tab), &ctx);
        tool.handle_key(key(KeyCode::Enter), &ctx);
        assert_eq!(tool.bmi, Some(22.9));
        assert_eq!(tool.download(tr()).unwrap().contents, b"BMI: 22.9");

        tool.fields[WEIGHT].set_text("");
        tool.handle_key(key(KeyCode::Enter), &ctx);
        assert_eq!(tool.bmi, Some(22.9));
    }
}
