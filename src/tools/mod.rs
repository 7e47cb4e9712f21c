//! The 20 utility tools.
//!
//! Each tool owns its form state and background tasks. A tool is created when
//! its view is entered and dropped when the view is left, which cancels any
//! task handles it holds. Output is recomputed from the form on every edit by
//! the pure functions each module exposes.

pub mod base64_tool;
pub mod base_converter;
pub mod bmi;
pub mod countdown;
pub mod discount;
pub mod email;
pub mod form;
pub mod image_compress;
pub mod markdown;
pub mod number;
pub mod password;
pub mod qr_code;
pub mod random_color;
pub mod reading_progress;
pub mod rgb_hex;
pub mod seo;
pub mod string_compare;
pub mod system_info;
pub mod text_cleaner;
pub mod time_zones;
pub mod unit_converter;
pub mod word_counter;

use crate::config::NetworkConfig;
use crate::core::input_result::InputResult;
use crate::core::messages::{AsyncEvent, ToolMessage};
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::{Language, Tr};
use crate::tasks::TaskHandle;
use crate::theme::AppTheme;
use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Everything a tool needs to draw itself
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub theme: &'a AppTheme,
    pub tr: Tr,
}

/// Handle back into the app for starting background work
#[derive(Clone)]
pub struct ToolContext {
    view: ViewState,
    events: UnboundedSender<AsyncEvent>,
    pub network: NetworkConfig,
}

impl ToolContext {
    pub fn new(view: ViewState, events: UnboundedSender<AsyncEvent>, network: NetworkConfig) -> Self {
        Self {
            view,
            events,
            network,
        }
    }

    /// Run `job` on the runtime and deliver its message to this tool
    pub fn spawn<F>(&self, name: &'static str, job: F) -> Option<TaskHandle>
    where
        F: Future<Output = ToolMessage> + Send + 'static,
    {
        let events = self.events.clone();
        let view = self.view;
        TaskHandle::spawn(name, async move {
            let message = job.await;
            // Receiver gone means the app is shutting down
            let _ = events.send(AsyncEvent::new(view, message));
        })
    }

    /// Run CPU-bound `job` on the blocking pool
    pub fn spawn_blocking<F>(&self, name: &'static str, job: F) -> Option<TaskHandle>
    where
        F: FnOnce() -> ToolMessage + Send + 'static,
    {
        let events = self.events.clone();
        let view = self.view;
        TaskHandle::spawn(name, async move {
            match tokio::task::spawn_blocking(job).await {
                Ok(message) => {
                    let _ = events.send(AsyncEvent::new(view, message));
                }
                Err(e) => tracing::error!("Background job '{}' failed: {}", name, e),
            }
        })
    }

    /// `Tick` every `period` until the handle is dropped
    pub fn ticker(&self, name: &'static str, period: Duration) -> Option<TaskHandle> {
        let events = self.events.clone();
        let view = self.view;
        TaskHandle::interval(name, period, move || {
            events.send(AsyncEvent::new(view, ToolMessage::Tick)).is_ok()
        })
    }
}

/// One mounted tool
pub trait Tool {
    fn view(&self) -> ViewState;

    /// Called once after creation; start timers and fetches here
    fn mount(&mut self, _ctx: &ToolContext) {}

    fn handle_key(&mut self, key: KeyEvent, ctx: &ToolContext) -> InputResult;

    /// Bracketed paste or Ctrl+V into the focused field
    fn handle_paste(&mut self, _text: &str, _ctx: &ToolContext) {}

    fn handle_message(&mut self, _message: ToolMessage, _ctx: &ToolContext) {}

    /// The interface language changed while this tool is mounted
    fn language_changed(&mut self, _tr: Tr) {}

    /// Rows the body needs at `width`
    fn height(&self, width: u16) -> u16;

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>);

    /// Row of the focused control, so the shell can keep it on screen
    fn focus_row(&self) -> u16 {
        0
    }

    /// File offered by Ctrl+S, if there is a result
    fn download(&self, _tr: Tr) -> Option<Download> {
        None
    }

    /// Whether Ctrl+S currently has something to save. Tools whose export is
    /// expensive to build override this.
    fn can_download(&self) -> bool {
        self.download(Tr::new(Language::FALLBACK)).is_some()
    }

    /// Primary result for Ctrl+Y
    fn clipboard_text(&self) -> Option<String> {
        None
    }
}

/// Instantiate the tool behind `view`. `None` for pages and home.
pub fn create_tool(view: ViewState, tr: Tr) -> Option<Box<dyn Tool>> {
    let tool: Box<dyn Tool> = match view {
        ViewState::Password => Box::new(password::PasswordTool::new()),
        ViewState::WordCounter => Box::new(word_counter::WordCounterTool::new()),
        ViewState::UnitConverter => Box::new(unit_converter::UnitConverterTool::new()),
        ViewState::BaseConverter => Box::new(base_converter::BaseConverterTool::new()),
        ViewState::Discount => Box::new(discount::DiscountTool::new()),
        ViewState::Email => Box::new(email::EmailTool::new()),
        ViewState::SystemInfo => Box::new(system_info::SystemInfoTool::new()),
        ViewState::RandomColor => Box::new(random_color::RandomColorTool::new()),
        ViewState::ReadingProgress => Box::new(reading_progress::ReadingProgressTool::new(tr)),
        ViewState::StringCompare => Box::new(string_compare::StringCompareTool::new()),
        ViewState::Seo => Box::new(seo::SeoTool::new(tr)),
        ViewState::Base64 => Box::new(base64_tool::Base64Tool::new()),
        ViewState::RgbHex => Box::new(rgb_hex::RgbHexTool::new()),
        ViewState::QrCode => Box::new(qr_code::QrCodeTool::new()),
        ViewState::Countdown => Box::new(countdown::CountdownTool::new()),
        ViewState::ImageCompress => Box::new(image_compress::ImageCompressTool::new()),
        ViewState::Bmi => Box::new(bmi::BmiTool::new()),
        ViewState::TextCleaner => Box::new(text_cleaner::TextCleanerTool::new()),
        ViewState::TimeZones => Box::new(time_zones::TimeZonesTool::new()),
        ViewState::Markdown => Box::new(markdown::MarkdownTool::new()),
        ViewState::Home | ViewState::About | ViewState::Privacy | ViewState::Contact => {
            return None
        }
    };
    Some(tool)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the tool tests
    use super::*;
    use crate::theme::{AppTheme, ThemeMode};
    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn type_text(tool: &mut dyn Tool, ctx: &ToolContext, text: &str) {
        for c in text.chars() {
            tool.handle_key(key(KeyCode::Char(c)), ctx);
        }
    }

    pub fn context(view: ViewState) -> (ToolContext, UnboundedReceiver<AsyncEvent>) {
        let (tx, rx) = unbounded_channel();
        (ToolContext::new(view, tx, NetworkConfig::default()), rx)
    }

    pub fn tr() -> Tr {
        Tr::new(Language::En)
    }

    /// Render into an offscreen buffer and return its text, row by row
    pub fn render_text(tool: &mut dyn Tool, width: u16) -> String {
        let theme = AppTheme::for_mode(ThemeMode::Light);
        let ui = RenderContext { theme: &theme, tr: tr() };
        let height = tool.height(width).max(1);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        tool.render(area, &mut buf, &ui);
        (0..height)
            .map(|y| {
                (0..width)
                    .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol().to_string()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
