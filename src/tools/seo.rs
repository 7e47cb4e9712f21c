//! Title and meta description length checker.

use super::form::{put, Focus, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use std::ops::RangeInclusive;

pub const TITLE_RANGE: RangeInclusive<usize> = 50..=60;
pub const DESCRIPTION_RANGE: RangeInclusive<usize> = 150..=160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRating {
    Good,
    Warn,
}

pub fn rate(text: &str, range: &RangeInclusive<usize>) -> LengthRating {
    if range.contains(&text.chars().count()) {
        LengthRating::Good
    } else {
        LengthRating::Warn
    }
}

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const DESCRIPTION_HEIGHT: u16 = 6;

pub struct SeoTool {
    fields: [TextField; 2],
    focus: Focus,
}

impl SeoTool {
    /// Seeded with the application's own title and description
    pub fn new(tr: Tr) -> Self {
        Self {
            fields: [
                TextField::single("label_page_title", tr.t("seo_default_title")),
                TextField::multiline("label_meta_description", tr.t("seo_default_description")),
            ],
            focus: Focus::new(2),
        }
    }

    fn render_rating(
        &self,
        area: Rect,
        buf: &mut Buffer,
        index: usize,
        range: &RangeInclusive<usize>,
        ui: &RenderContext<'_>,
    ) {
        let text = self.fields[index].text();
        let color = match rate(&text, range) {
            LengthRating::Good => ui.theme.status_success,
            LengthRating::Warn => ui.theme.status_warning,
        };
        let count = ui.tr.fmt("seo_chars", &[("count", &text.chars().count().to_string())]);
        let target = ui.tr.fmt(
            "seo_target",
            &[("range", &format!("{}-{}", range.start(), range.end()))],
        );
        put(buf, area.x + 2, area.y, &count, area.width.saturating_sub(2), Style::default().fg(color));
        let target_x = area.x + 2 + count.chars().count() as u16 + 3;
        if target_x < area.right() {
            put(
                buf,
                target_x,
                area.y,
                &target,
                area.right() - target_x,
                Style::default().fg(ui.theme.text_secondary),
            );
        }
    }
}

impl Tool for SeoTool {
    fn view(&self) -> ViewState {
        ViewState::Seo
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
        DESCRIPTION_HEIGHT + 4
    }

    fn focus_row(&self) -> u16 {
        if self.focus.is(TITLE) {
            0
        } else {
            3
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let focus = self.focus;
        self.fields[TITLE].render(rows.take(1), buf, focus.is(TITLE), ui);
        let rating = rows.take(1);
        self.render_rating(rating, buf, TITLE, &TITLE_RANGE, ui);
        rows.skip(1);
        self.fields[DESCRIPTION].render(rows.take(DESCRIPTION_HEIGHT), buf, focus.is(DESCRIPTION), ui);
        let rating = rows.take(1);
        self.render_rating(rating, buf, DESCRIPTION, &DESCRIPTION_RANGE, ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text(
            "seo.txt",
            format!(
                "Title: {}\nDesc: {}",
                self.fields[TITLE].text().chars().count(),
                self.fields[DESCRIPTION].text().chars().count()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_rate_bounds() {
        assert_eq!(rate(&"x".repeat(49), &TITLE_RANGE), LengthRating::Warn);
        assert_eq!(rate(&"x".repeat(50), &TITLE_RANGE), LengthRating::Good);
        assert_eq!(rate(&"x".repeat(60), &TITLE_RANGE), LengthRating::Good);
        assert_eq!(rate(&"x".repeat(61), &TITLE_RANGE), LengthRating::Warn);
        assert_eq!(rate(&"é".repeat(155), &DESCRIPTION_RANGE), LengthRating::Good);
    }

    #[test]
    fn test_seeded_from_app_strings() {
        let tool = SeoTool::new(tr());
        assert_eq!(tool.fields[TITLE].text(), tr().t("seo_default_title"));
        let download = String::from_utf8(tool.download(tr()).unwrap().contents).unwrap();
        assert!(download.starts_with("Title: "));
        assert!(download.contains("\nDesc: "));
    }

    #[test]
    fn test_editing_changes_counts() {
        let (ctx, _rx) = context(ViewState::Seo);
        let mut tool = SeoTool::new(tr());
        tool.fields[TITLE].set_text("");
        type_text(&mut tool, &ctx, "abc");
        let download = String::from_utf8(tool.download(tr()).unwrap().contents).unwrap();
        assert!(download.starts_with("Title: 3\n"));
    }
}
