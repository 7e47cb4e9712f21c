//! Contact page form. There is no server: accepted messages are appended to
//! a JSON-lines outbox in the data directory.

use crate::tools::email::is_valid_email;
use crate::tools::form::{put, render_button, wrapped_lines, Focus, Rows, TextField};
use crate::tools::RenderContext;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget, Wrap},
};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// One line of the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub sent_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Sent,
    Missing,
    BadEmail,
    Failed,
}

impl SubmitStatus {
    pub fn message_key(self) -> &'static str {
        match self {
            SubmitStatus::Sent => "contact_sent",
            SubmitStatus::Missing => "contact_missing",
            SubmitStatus::BadEmail => "contact_bad_email",
            SubmitStatus::Failed => "contact_failed",
        }
    }
}

/// Required fields first, then the address format
pub fn validate(name: &str, email: &str, message: &str) -> std::result::Result<(), SubmitStatus> {
    if name.trim().is_empty() || email.trim().is_empty() || message.trim().is_empty() {
        return Err(SubmitStatus::Missing);
    }
    if !is_valid_email(email.trim()) {
        return Err(SubmitStatus::BadEmail);
    }
    Ok(())
}

pub fn append_to_outbox(path: &Path, message: &ContactMessage) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let mut line = serde_json::to_string(message).context("Failed to serialize message")?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open outbox {:?}", path))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to write outbox {:?}", path))?;
    Ok(())
}

const NAME: usize = 0;
const EMAIL: usize = 1;
const MESSAGE: usize = 2;
const SEND: usize = 3;
const MESSAGE_HEIGHT: u16 = 6;

pub struct ContactForm {
    name: TextField,
    email: TextField,
    message: TextField,
    focus: Focus,
    status: Option<SubmitStatus>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: TextField::single("contact_name", ""),
            email: TextField::single("contact_email", "").with_placeholder("you@example.com"),
            message: TextField::multiline("contact_message", ""),
            focus: Focus::new(4),
            status: None,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<SubmitStatus> {
        self.status
    }

    /// Validate and append to `outbox`. The form is cleared once accepted.
    pub fn submit(&mut self, outbox: &Path) -> SubmitStatus {
        let (name, email, message) = (self.name.text(), self.email.text(), self.message.text());
        let status = match validate(&name, &email, &message) {
            Err(status) => status,
            Ok(()) => {
                let entry = ContactMessage {
                    name: name.trim().to_string(),
                    email: email.trim().to_string(),
                    message,
                    sent_at: chrono::Local::now().to_rfc3339(),
                };
                match append_to_outbox(outbox, &entry) {
                    Ok(()) => {
                        tracing::info!("Contact message queued in {:?}", outbox);
                        *self = Self::new();
                        SubmitStatus::Sent
                    }
                    Err(e) => {
                        tracing::error!("Contact submit failed: {:#}", e);
                        SubmitStatus::Failed
                    }
                }
            }
        };
        self.status = Some(status);
        status
    }

    /// Returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent, outbox: &Path) -> bool {
        if self.focus.handle_key(&key) {
            return true;
        }
        match (self.focus.index(), key.code) {
            (SEND, KeyCode::Enter) => {
                self.submit(outbox);
                true
            }
            (NAME | EMAIL, KeyCode::Enter) => {
                self.focus.next();
                true
            }
            (NAME, _) => self.name.input(key),
            (EMAIL, _) => self.email.input(key),
            (MESSAGE, _) => self.message.input(key),
            _ => false,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.focus.index() {
            NAME => self.name.paste(text),
            EMAIL => self.email.paste(text),
            MESSAGE => self.message.paste(text),
            _ => false,
        };
    }

    fn intro_height(&self, width: u16, ui: &RenderContext<'_>) -> u16 {
        wrapped_lines(ui.tr.t("contact_intro"), width)
    }

    pub fn height(&self, width: u16, ui: &RenderContext<'_>) -> u16 {
        self.intro_height(width, ui) + 1 + 2 + MESSAGE_HEIGHT + 1 + 1 + 2
    }

    /// Row of the focused control
    pub fn focus_row(&self, width: u16, ui: &RenderContext<'_>) -> u16 {
        let top = self.intro_height(width, ui) + 1;
        match self.focus.index() {
            NAME => top,
            EMAIL => top + 1,
            MESSAGE => top + 2,
            _ => top + 2 + MESSAGE_HEIGHT + 1,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let intro = rows.take(self.intro_height(area.width, ui));
        Paragraph::new(ui.tr.t("contact_intro"))
            .style(Style::default().fg(ui.theme.text_secondary))
            .wrap(Wrap { trim: true })
            .render(intro, buf);
        rows.skip(1);

        self.name.render(rows.take(1), buf, self.focus.is(NAME), ui);
        self.email.render(rows.take(1), buf, self.focus.is(EMAIL), ui);
        self.message
            .render(rows.take(MESSAGE_HEIGHT), buf, self.focus.is(MESSAGE), ui);
        rows.skip(1);
        render_button(rows.take(1), buf, ui.tr.t("contact_send"), self.focus.is(SEND), ui);
        rows.skip(1);

        if let Some(status) = self.status {
            let color = if status == SubmitStatus::Sent {
                ui.theme.status_success
            } else {
                ui.theme.status_error
            };
            let row = rows.take(1);
            put(buf, row.x, row.y, ui.tr.t(status.message_key()), row.width, Style::default().fg(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_into(form: &mut ContactForm, outbox: &Path, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), outbox);
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate("", "a@b.co", "hi"), Err(SubmitStatus::Missing));
        assert_eq!(validate("Ann", "a@b.co", "   "), Err(SubmitStatus::Missing));
        assert_eq!(validate("Ann", "not-an-email", "hi"), Err(SubmitStatus::BadEmail));
        assert_eq!(validate("Ann", "a@b.co", "hi"), Ok(()));
    }

    #[test]
    fn test_submit_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("nested").join("outbox.jsonl");

        for (name, email) in [("Ann", "ann@example.com"), ("Bo", "bo@example.org")] {
            let mut form = ContactForm::new();
            type_into(&mut form, &outbox, name);
            form.handle_key(key(KeyCode::Tab), &outbox);
            type_into(&mut form, &outbox, email);
            form.handle_key(key(KeyCode::Tab), &outbox);
            type_into(&mut form, &outbox, "Hello there");
            form.handle_key(key(KeyCode::Tab), &outbox);
            form.handle_key(key(KeyCode::Enter), &outbox);
            assert_eq!(form.status(), Some(SubmitStatus::Sent));
            assert!(form.name.is_empty());
        }

        let contents = std::fs::read_to_string(&outbox).unwrap();
        let messages: Vec<ContactMessage> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].name, "Ann");
        assert_eq!(messages[1].email, "bo@example.org");
        assert_eq!(messages[1].message, "Hello there");
    }

    #[test]
    fn test_invalid_submit_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox.jsonl");
        let mut form = ContactForm::new();
        type_into(&mut form, &outbox, "Ann");
        form.focus.set(SEND);
        assert_eq!(form.submit(&outbox), SubmitStatus::Missing);
        assert_eq!(form.name.text(), "Ann");
        assert!(!outbox.exists());
    }
}
