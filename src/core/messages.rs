//! Messages delivered from background tasks to the mounted tool.
//!
//! Every task a tool starts sends its result as an `AsyncEvent` addressed to
//! the tool's view. The app drops events whose view is no longer mounted, so
//! a late reply can never reach a different tool.

use crate::core::view::ViewState;
use crate::tools::image_compress::CompressedImage;
use crate::tools::markdown::PreviewLine;
use crate::tools::qr_code::QrMatrix;

#[derive(Debug)]
pub enum ToolMessage {
    /// One-second clock tick (countdown, time zones)
    Tick,

    /// Public IP lookup finished
    IpResolved(Result<String, String>),

    /// QR matrix for the text at `generation`
    QrRendered {
        generation: u64,
        result: Result<QrMatrix, String>,
    },

    /// HTML and terminal preview for the Markdown input at `generation`
    MarkdownRendered {
        generation: u64,
        html: String,
        preview: Vec<PreviewLine>,
    },

    /// JPEG re-encode for the request at `generation`
    ImageCompressed {
        generation: u64,
        result: Result<CompressedImage, String>,
    },
}

/// A `ToolMessage` plus the view it is addressed to
#[derive(Debug)]
pub struct AsyncEvent {
    pub view: ViewState,
    pub message: ToolMessage,
}

impl AsyncEvent {
    pub fn new(view: ViewState, message: ToolMessage) -> Self {
        Self { view, message }
    }

    /// True if this event may be delivered while `mounted` is showing
    pub fn is_for(&self, mounted: Option<ViewState>) -> bool {
        mounted == Some(self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressing() {
        let event = AsyncEvent::new(ViewState::Countdown, ToolMessage::Tick);
        assert!(event.is_for(Some(ViewState::Countdown)));
        assert!(!event.is_for(Some(ViewState::TimeZones)));
        assert!(!event.is_for(None));
    }
}
