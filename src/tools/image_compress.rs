//! Re-encode a local image as JPEG at a chosen quality.

use super::form::{put, render_button, render_value, Focus, Rows, Slider, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use image::codecs::jpeg::JpegEncoder;
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};
use std::path::PathBuf;

/// Quality in tenths: 1..=10 maps to 0.1..=1.0
pub const DEFAULT_QUALITY_TENTHS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub original_size: u64,
    pub bytes: Vec<u8>,
}

/// `~/` expanded, surrounding quotes (from drag and drop) removed
pub fn expand_path(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches(|c| c == '"' || c == '\'');
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}

/// Decode any supported image and encode it as JPEG (`quality` 1..=100)
pub fn compress_bytes(original: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(original).context("Unsupported or corrupt image")?;
    let rgb = decoded.to_rgb8();
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)))
        .context("JPEG encoding failed")?;
    Ok(out)
}

pub fn compress_file(path: &std::path::Path, quality: u8) -> Result<CompressedImage> {
    let original = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let bytes = compress_bytes(&original, quality)?;
    tracing::info!(
        "Compressed {:?}: {} -> {} bytes at quality {}",
        path,
        original.len(),
        bytes.len(),
        quality
    );
    Ok(CompressedImage {
        original_size: original.len() as u64,
        bytes,
    })
}

pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

enum Output {
    Empty,
    Working,
    Done(CompressedImage),
    Failed(String),
}

const PATH: usize = 0;
const QUALITY: usize = 1;
const COMPRESS: usize = 2;

pub struct ImageCompressTool {
    path: TextField,
    quality: Slider,
    output: Output,
    generation: u64,
    job: Option<TaskHandle>,
    focus: Focus,
}

impl ImageCompressTool {
    pub fn new() -> Self {
        Self {
            path: TextField::single("label_image_path", "").with_placeholder("~/Pictures/photo.png"),
            quality: Slider::new("label_quality", DEFAULT_QUALITY_TENTHS, 1, 10, 1),
            output: Output::Empty,
            generation: 0,
            job: None,
            focus: Focus::new(3),
        }
    }

    fn quality_percent(&self) -> u8 {
        (self.quality.value * 10) as u8
    }

    fn request_compress(&mut self, ctx: &ToolContext) {
        if self.path.is_empty() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let path = expand_path(&self.path.text());
        let quality = self.quality_percent();
        self.output = Output::Working;
        self.job = ctx.spawn_blocking("image-compress", move || ToolMessage::ImageCompressed {
            generation,
            result: compress_file(&path, quality).map_err(|e| format!("{:#}", e)),
        });
    }
}

impl Tool for ImageCompressTool {
    fn view(&self) -> ViewState {
        ViewState::ImageCompress
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match (self.focus.index(), key.code) {
            (PATH | COMPRESS, KeyCode::Enter) => {
                self.request_compress(ctx);
                true
            }
            (PATH, _) => self.path.input(key),
            (QUALITY, _) => {
                let changed = self.quality.handle_key(&key);
                // Re-run with the new quality once an image has been chosen
                if changed && matches!(self.output, Output::Done(_)) {
                    self.request_compress(ctx);
                }
                changed
            }
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        self.path.set_text(text.trim());
        self.focus.set(PATH);
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::ImageCompressed { generation, result } = message {
            if generation != self.generation {
                return;
            }
            self.output = match result {
                Ok(image) => Output::Done(image),
                Err(e) => Output::Failed(e),
            };
            self.job = None;
        }
    }

    fn height(&self, _width: u16) -> u16 {
        8
    }

    fn focus_row(&self) -> u16 {
        match self.focus.index() {
            COMPRESS => 3,
            index => index as u16,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.path.render(rows.take(1), buf, self.focus.is(PATH), ui);
        self.quality.render(
            rows.take(1),
            buf,
            self.focus.is(QUALITY),
            &format!("{}%", self.quality_percent()),
            ui,
        );
        rows.skip(1);
        render_button(rows.take(1), buf, ui.tr.t("compress_button"), self.focus.is(COMPRESS), ui);
        rows.skip(1);

        match &self.output {
            Output::Empty => {}
            Output::Working => {
                let row = rows.take(1);
                put(buf, row.x, row.y, ui.tr.t("loading"), row.width, Style::default().fg(ui.theme.text_disabled));
            }
            Output::Failed(error) => {
                let row = rows.take(1);
                put(
                    buf,
                    row.x,
                    row.y,
                    &format!("{}: {}", ui.tr.t("compress_failed"), error),
                    row.width,
                    Style::default().fg(ui.theme.status_error),
                );
            }
            Output::Done(image) => {
                render_value(
                    rows.take(1),
                    buf,
                    ui.tr.t("label_original"),
                    &format_kb(image.original_size),
                    Style::default().fg(ui.theme.text_primary),
                    ui,
                );
                render_value(
                    rows.take(1),
                    buf,
                    ui.tr.t("label_compressed"),
                    &format_kb(image.bytes.len() as u64),
                    Style::default()
                        .fg(ui.theme.status_success)
                        .add_modifier(Modifier::BOLD),
                    ui,
                );
            }
        }
    }

    fn can_download(&self) -> bool {
        matches!(self.output, Output::Done(_))
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        match &self.output {
            Output::Done(image) => Some(Download::bytes("compressed.jpg", image.bytes.clone())),
            _ => None,
        }
    }
}
