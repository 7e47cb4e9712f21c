//! Two-way Base64 encoder/decoder.

use super::form::{Focus, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect};

/// Written into the paired field when decoding fails
pub const DECODE_ERROR: &str = "Error";

/// Standard alphabet, padding optional when decoding
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(text: &str) -> String {
    ENGINE.encode(text.as_bytes())
}

/// Decode to UTF-8 text; whitespace in the input is ignored
pub fn decode(encoded: &str) -> Result<String, String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = ENGINE.decode(compact).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

const TEXT: usize = 0;
const BASE64: usize = 1;
const FIELD_HEIGHT: u16 = 8;

pub struct Base64Tool {
    fields: [TextField; 2],
    focus: Focus,
}

impl Base64Tool {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::multiline("label_text", ""),
                TextField::multiline("label_base64", ""),
            ],
            focus: Focus::new(2),
        }
    }

    /// Recompute the field opposite to `edited`
    fn sync_from(&mut self, edited: usize) {
        if edited == TEXT {
            let encoded = encode(&self.fields[TEXT].text());
            self.fields[BASE64].set_text(&encoded);
        } else {
            let decoded = decode(&self.fields[BASE64].text()).unwrap_or_else(|e| {
                tracing::debug!("Base64 decode failed: {}", e);
                DECODE_ERROR.to_string()
            });
            self.fields[TEXT].set_text(&decoded);
        }
    }
}

impl Tool for Base64Tool {
    fn view(&self) -> ViewState {
        ViewState::Base64
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let index = self.focus.index();
        let changed = self.fields[index].input(key);
        if changed {
            self.sync_from(index);
        }
        InputResult::handled(changed)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        let index = self.focus.index();
        if self.fields[index].paste(text) {
            self.sync_from(index);
        }
    }

    fn height(&self, _width: u16) -> u16 {
        FIELD_HEIGHT * 2 + 1
    }

    fn focus_row(&self) -> u16 {
        self.focus.index() as u16 * (FIELD_HEIGHT + 1)
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let focus = self.focus;
        self.fields[TEXT].render(rows.take(FIELD_HEIGHT), buf, focus.is(TEXT), ui);
        rows.skip(1);
        self.fields[BASE64].render(rows.take(FIELD_HEIGHT), buf, focus.is(BASE64), ui);
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("base64.txt", self.fields[BASE64].text()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.fields[BASE64].text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode("hello"), "aGVsbG8=");
        assert_eq!(encode("héllo ✓"), "aMOpbGxvIOKckw==");
        assert_eq!(decode("aGVsbG8=").unwrap(), "hello");
        assert_eq!(decode("aGVsbG8").unwrap(), "hello");
        assert_eq!(decode("aGVs\nbG8=").unwrap(), "hello");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_decode_failures() {
        assert!(decode("***").is_err());
        // 0xFF is not valid UTF-8
        assert!(decode("/w==").is_err());
    }

    #[test]
    fn test_fields_stay_paired() {
        let (ctx, _rx) = context(ViewState::Base64);
        let mut tool = Base64Tool::new();
        type_text(&mut tool, &ctx, "hi");
        assert_eq!(tool.fields[BASE64].text(), "aGk=");

        tool.handle_key(key(KeyCode::Tab), &ctx);
        type_text(&mut tool, &ctx, "!");
        assert_eq!(tool.fields[TEXT].text(), DECODE_ERROR);
        assert_eq!(tool.download(tr()).unwrap().contents, b"aGk=!");
    }
}
