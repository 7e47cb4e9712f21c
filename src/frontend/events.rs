//! Frontend-agnostic input events.
//!
//! The TUI translates crossterm's event stream into this enum so the event
//! loop only handles one event shape.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};

/// Rows moved per mouse wheel notch
pub const WHEEL_STEP: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
        modifiers: KeyModifiers,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Bracketed paste
    Paste { text: String },
}

impl FrontendEvent {
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    pub fn mouse(kind: MouseEventKind, x: u16, y: u16, modifiers: KeyModifiers) -> Self {
        Self::Mouse {
            kind,
            x,
            y,
            modifiers,
        }
    }

    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    pub fn paste(text: String) -> Self {
        Self::Paste { text }
    }

    /// The key press this event carries, if any
    pub fn as_key_event(&self) -> Option<KeyEvent> {
        match self {
            Self::Key { code, modifiers } => Some(KeyEvent::new(*code, *modifiers)),
            _ => None,
        }
    }

    /// Scroll delta for wheel events
    pub fn scroll_delta(&self) -> Option<i32> {
        match self {
            Self::Mouse {
                kind: MouseEventKind::ScrollUp,
                ..
            } => Some(-WHEEL_STEP),
            Self::Mouse {
                kind: MouseEventKind::ScrollDown,
                ..
            } => Some(WHEEL_STEP),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let key_event = FrontendEvent::key(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(
            key_event.as_key_event(),
            Some(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL))
        );

        let resize_event = FrontendEvent::resize(120, 40);
        assert!(matches!(
            resize_event,
            FrontendEvent::Resize {
                width: 120,
                height: 40
            }
        ));
        assert!(resize_event.as_key_event().is_none());
    }

    #[test]
    fn test_wheel_scrolls() {
        let up = FrontendEvent::mouse(MouseEventKind::ScrollUp, 0, 0, KeyModifiers::NONE);
        let down = FrontendEvent::mouse(MouseEventKind::ScrollDown, 0, 0, KeyModifiers::NONE);
        let moved = FrontendEvent::mouse(MouseEventKind::Moved, 0, 0, KeyModifiers::NONE);
        assert_eq!(up.scroll_delta(), Some(-WHEEL_STEP));
        assert_eq!(down.scroll_delta(), Some(WHEEL_STEP));
        assert_eq!(moved.scroll_delta(), None);
    }
}
