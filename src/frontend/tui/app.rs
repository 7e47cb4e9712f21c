use super::shell;
use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// TUI Frontend using ratatui
///
/// Renders the shell with ratatui and reads input via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    restored: bool,
}

impl TuiFrontend {
    /// Initializes the terminal in raw mode with mouse capture and bracketed
    /// paste, on the alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )
        .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(100),
            restored: false,
        })
    }

    /// Set poll timeout (bounds how long a background result waits for a redraw)
    pub fn set_poll_timeout(&mut self, timeout: Duration) {
        self.poll_timeout = timeout;
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only key presses; releases and repeats arrive on some terminals
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
                mouse_event.modifiers,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            Event::Paste(text) => Some(FrontendEvent::paste(text)),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Wait up to the timeout for the first event, then drain what is queued
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            match event::read() {
                Ok(ev) => {
                    if let Some(frontend_event) = Self::convert_event(ev) {
                        events.push(frontend_event);
                    }
                }
                Err(e) => tracing::warn!("Failed to read terminal event: {}", e),
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, core: &mut AppCore) -> Result<()> {
        self.terminal
            .draw(|f| {
                let area = f.area();
                shell::render(area, f.buffer_mut(), core);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_convert_ignores_key_release() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(
            TuiFrontend::convert_event(press),
            Some(FrontendEvent::key(KeyCode::Char('a'), KeyModifiers::NONE))
        );

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(TuiFrontend::convert_event(release), None);
    }

    #[test]
    fn test_convert_paste_and_resize() {
        assert_eq!(
            TuiFrontend::convert_event(Event::Paste("hi".into())),
            Some(FrontendEvent::paste("hi".into()))
        );
        assert_eq!(
            TuiFrontend::convert_event(Event::Resize(80, 24)),
            Some(FrontendEvent::resize(80, 24))
        );
        assert_eq!(TuiFrontend::convert_event(Event::FocusGained), None);
    }
}
