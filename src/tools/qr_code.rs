//! QR code generator. Encoding runs on the blocking pool; the preview is
//! drawn with half-block characters, two modules per terminal row.

use super::form::{put, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::QrCode;
use ratatui::{buffer::Buffer, layout::Rect, style::{Color, Style}};
use std::io::Cursor;

pub const DEFAULT_TEXT: &str = "https://google.com";
/// Light border around the symbol, in modules
const QUIET_ZONE: usize = 2;
/// Pixels per module in the PNG
const PNG_SCALE: u32 = 8;

/// Square module grid, row-major, `true` = dark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    pub width: usize,
    pub modules: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(text: &str) -> Result<Self> {
        if text.is_empty() {
            bail!("Nothing to encode");
        }
        let code = QrCode::new(text.as_bytes()).context("Text does not fit in a QR code")?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            modules,
        })
    }

    /// Dark module at (x, y); the quiet zone and outside are light
    pub fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.width {
            return false;
        }
        self.modules[y as usize * self.width + x as usize]
    }

    /// Side length including the quiet zone
    pub fn padded_width(&self) -> usize {
        self.width + QUIET_ZONE * 2
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let side = self.padded_width() as u32 * PNG_SCALE;
        let quiet = QUIET_ZONE as isize;
        let img = ImageBuffer::from_fn(side, side, |px, py| {
            let x = (px / PNG_SCALE) as isize - quiet;
            let y = (py / PNG_SCALE) as isize - quiet;
            if self.is_dark(x, y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("Failed to encode PNG")?;
        Ok(bytes)
    }
}

enum Preview {
    Loading,
    Ready(QrMatrix),
    Failed(String),
}

pub struct QrCodeTool {
    input: TextField,
    preview: Preview,
    /// Bumped on every edit; results for older generations are dropped
    generation: u64,
    job: Option<TaskHandle>,
}

impl QrCodeTool {
    pub fn new() -> Self {
        Self {
            input: TextField::single("label_qr_text", DEFAULT_TEXT).with_placeholder("URL..."),
            preview: Preview::Loading,
            generation: 0,
            job: None,
        }
    }

    fn request_render(&mut self, ctx: &ToolContext) {
        self.generation += 1;
        let generation = self.generation;
        let text = self.input.text();
        self.preview = Preview::Loading;
        self.job = ctx.spawn_blocking("qr-render", move || ToolMessage::QrRendered {
            generation,
            result: QrMatrix::encode(&text).map_err(|e| e.to_string()),
        });
    }
}

impl Tool for QrCodeTool {
    fn view(&self) -> ViewState {
        ViewState::QrCode
    }

    fn mount(&mut self, ctx: &ToolContext) {
        self.request_render(ctx);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        let changed = self.input.input(key);
        if changed {
            self.request_render(ctx);
        }
        InputResult::handled(changed)
    }

    fn handle_paste(&mut self, text: &str, ctx: &ToolContext) {
        if self.input.paste(text) {
            self.request_render(ctx);
        }
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::QrRendered { generation, result } = message {
            if generation != self.generation {
                tracing::debug!("Dropping stale QR render {} (current {})", generation, self.generation);
                return;
            }
            self.preview = match result {
                Ok(matrix) => Preview::Ready(matrix),
                Err(e) => Preview::Failed(e),
            };
            self.job = None;
        }
    }

    fn height(&self, _width: u16) -> u16 {
        let preview = match &self.preview {
            Preview::Ready(matrix) => matrix.padded_width().div_ceil(2) as u16,
            _ => 1,
        };
        2 + preview
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.input.render(rows.take(1), buf, true, ui);
        rows.skip(1);

        let matrix = match &self.preview {
            Preview::Ready(matrix) => matrix,
            Preview::Loading => {
                let row = rows.take(1);
                put(buf, row.x, row.y, ui.tr.t("loading"), row.width, Style::default().fg(ui.theme.text_disabled));
                return;
            }
            Preview::Failed(error) => {
                let row = rows.take(1);
                put(buf, row.x, row.y, error, row.width, Style::default().fg(ui.theme.status_error));
                return;
            }
        };

        let side = matrix.padded_width();
        let preview = rows.take(side.div_ceil(2) as u16);
        let quiet = QUIET_ZONE as isize;
        let color = |dark: bool| if dark { Color::Black } else { Color::White };
        for row in 0..preview.height as usize {
            for col in 0..side.min(preview.width as usize) {
                let x = col as isize - quiet;
                let top = matrix.is_dark(x, (row * 2) as isize - quiet);
                let bottom = (row * 2 + 1) < side && matrix.is_dark(x, (row * 2 + 1) as isize - quiet);
                if let Some(cell) = buf.cell_mut((preview.x + col as u16, preview.y + row as u16)) {
                    cell.set_symbol("▀")
                        .set_style(Style::default().fg(color(top)).bg(color(bottom)));
                }
            }
        }
    }

    fn can_download(&self) -> bool {
        matches!(self.preview, Preview::Ready(_))
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        let Preview::Ready(matrix) = &self.preview else {
            return None;
        };
        match matrix.to_png() {
            Ok(png) => Some(Download::bytes("qrcode.png", png)),
            Err(e) => {
                tracing::error!("QR export failed: {:#}", e);
                None
            }
        }
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.input.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_encode_default_text() {
        let matrix = QrMatrix::encode(DEFAULT_TEXT).unwrap();
        assert!(matrix.width >= 21);
        assert_eq!((matrix.width - 17) % 4, 0);
        assert_eq!(matrix.modules.len(), matrix.width * matrix.width);
        // Finder pattern corners are dark
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(matrix.width as isize - 1, 0));
        assert!(!matrix.is_dark(-1, 0));
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(QrMatrix::encode("").is_err());
    }

    #[test]
    fn test_png_export() {
        let png = QrMatrix::encode("hi").unwrap().to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let (ctx, _rx) = context(ViewState::QrCode);
        let mut tool = QrCodeTool::new();
        tool.generation = 2;
        tool.handle_message(
            ToolMessage::QrRendered {
                generation: 1,
                result: QrMatrix::encode("old").map_err(|e| e.to_string()),
            },
            &ctx,
        );
        assert!(matches!(tool.preview, Preview::Loading));
        assert!(tool.download(tr()).is_none());

        tool.handle_message(
            ToolMessage::QrRendered {
                generation: 2,
                result: QrMatrix::encode("new").map_err(|e| e.to_string()),
            },
            &ctx,
        );
        assert!(matches!(tool.preview, Preview::Ready(_)));
        assert_eq!(tool.download(tr()).unwrap().filename, "qrcode.png");
    }

    #[tokio::test]
    async fn test_mount_renders_in_background() {
        let (ctx, mut rx) = context(ViewState::QrCode);
        let mut tool = QrCodeTool::new();
        tool.mount(&ctx);
        let event = rx.recv().await.unwrap();
        tool.handle_message(event.message, &ctx);
        assert!(matches!(tool.preview, Preview::Ready(_)));
        assert!(render_text(&mut tool, 40).contains('▀'));
    }
}
