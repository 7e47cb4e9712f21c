//! System clipboard behind Ctrl+Y (copy the mounted tool's result) and
//! Ctrl+V (paste into the focused field).

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put a tool result on the clipboard. Empty results are skipped.
pub fn copy(text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    Clipboard::new()
        .context("Clipboard unavailable")?
        .set_text(text)
        .context("Clipboard rejected the text")?;
    tracing::debug!("Result copied ({} chars)", text.chars().count());
    Ok(())
}

/// Clipboard text as-is; fields run it through `normalize_newlines`
pub fn paste() -> Result<String> {
    Clipboard::new()
        .context("Clipboard unavailable")?
        .get_text()
        .context("Clipboard holds no text")
}

/// `\r\n` and lone `\r` become `\n`. Terminals and Windows clipboards both
/// hand over carriage returns that the text areas would show literally.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
