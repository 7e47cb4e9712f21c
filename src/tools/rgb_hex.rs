//! RGB <-> HEX color converter.

use super::form::{Focus, Rows, Slider, TextField};
use super::random_color::render_swatch;
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crossterm::event::{KeyCode, KeyEvent};
use regex::Regex;
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::OnceLock;

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Accepts `RRGGBB` with or without `#`, any case
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("valid hex regex")
    });
    let caps = re.captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
    Some((channel(1)?, channel(2)?, channel(3)?))
}

const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;
const HEX: usize = 3;
const SWATCH_HEIGHT: u16 = 3;

pub struct RgbHexTool {
    channels: [Slider; 3],
    hex: TextField,
    focus: Focus,
}

impl RgbHexTool {
    pub fn new() -> Self {
        Self {
            channels: [
                Slider::new("label_red", 59, 0, 255, 1),
                Slider::new("label_green", 130, 0, 255, 1),
                Slider::new("label_blue", 246, 0, 255, 1),
            ],
            hex: TextField::single("label_hex", "#3B82F6"),
            focus: Focus::new(4),
        }
    }

    fn rgb(&self) -> (u8, u8, u8) {
        let c = |i: usize| self.channels[i].value.clamp(0, 255) as u8;
        (c(RED), c(GREEN), c(BLUE))
    }

    fn sync_hex(&mut self) {
        let (r, g, b) = self.rgb();
        self.hex.set_text(&rgb_to_hex(r, g, b));
    }

    /// An invalid hex leaves the channels untouched
    fn sync_channels(&mut self) {
        if let Some((r, g, b)) = hex_to_rgb(&self.hex.text()) {
            self.channels[RED].value = r as i64;
            self.channels[GREEN].value = g as i64;
            self.channels[BLUE].value = b as i64;
        }
    }
}

impl Tool for RgbHexTool {
    fn view(&self) -> ViewState {
        ViewState::RgbHex
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match self.focus.index() {
            HEX => {
                let changed = self.hex.input(key);
                if changed {
                    self.sync_channels();
                }
                changed
            }
            index => {
                let changed = self.channels[index].handle_key(&key);
                if changed {
                    self.sync_hex();
                }
                changed
            }
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        if self.focus.is(HEX) {
            self.hex.set_text(text.trim());
            self.sync_channels();
        }
    }

    fn height(&self, _width: u16) -> u16 {
        SWATCH_HEIGHT + 6
    }

    fn focus_row(&self) -> u16 {
        SWATCH_HEIGHT + 1 + self.focus.index() as u16
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let (r, g, b) = self.rgb();
        let swatch = rows.take(SWATCH_HEIGHT);
        render_swatch(
            Rect::new(swatch.x, swatch.y, swatch.width.min(24), swatch.height),
            buf,
            &rgb_to_hex(r, g, b),
        );
        rows.skip(1);
        let focus = self.focus;
        for (i, channel) in self.channels.iter().enumerate() {
            channel.render(rows.take(1), buf, focus.is(i), &channel.value.to_string(), ui);
        }
        self.hex.render(rows.take(1), buf, focus.is(HEX), ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("color.txt", self.hex.text()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.hex.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_conversions() {
        assert_eq!(rgb_to_hex(59, 130, 246), "#3B82F6");
        assert_eq!(rgb_to_hex(0, 0, 0), "#000000");
        assert_eq!(hex_to_rgb("#3b82f6"), Some((59, 130, 246)));
        assert_eq!(hex_to_rgb("FFFFFF"), Some((255, 255, 255)));
        assert_eq!(hex_to_rgb("#FFF"), None);
        assert_eq!(hex_to_rgb("#GG0000"), None);
    }

    #[test]
    fn test_slider_updates_hex() {
        let (ctx, _rx) = context(ViewState::RgbHex);
        let mut tool = RgbHexTool::new();
        tool.handle_key(key(KeyCode::Right), &ctx);
        assert_eq!(tool.hex.text(), "#3C82F6");
        tool.handle_key(key(KeyCode::End), &ctx);
        assert_eq!(tool.hex.text(), "#FF82F6");
    }

    #[test]
    fn test_invalid_hex_keeps_channels() {
        let (ctx, _rx) = context(ViewState::RgbHex);
        let mut tool = RgbHexTool::new();
        tool.focus.set(HEX);
        tool.handle_key(key(KeyCode::Backspace), &ctx);
        assert_eq!(tool.hex.text(), "#3B82F");
        assert_eq!(tool.rgb(), (59, 130, 246));
        type_text(&mut tool, &ctx, "0");
        assert_eq!(tool.rgb(), (59, 130, 240));
        assert_eq!(tool.download(tr()).unwrap().contents, b"#3B82F0");
    }
}
