//! What should happen after a tool (or page form) handles a key.
//!
//! The shell matches on `InputResult` instead of knowing which tool is
//! mounted; tools never navigate by themselves.

/// Result of handling input in a tool or form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Key consumed, stay on the current view
    Continue,

    /// Key not used; the shell may apply its own binding (scrolling, quit)
    Ignored,

    /// Leave the tool and return to the home grid
    Close,
}

impl InputResult {
    /// Helper to create a Close result
    pub fn close() -> Self {
        InputResult::Close
    }

    /// `Continue` if `handled`, else `Ignored`
    pub fn handled(handled: bool) -> Self {
        if handled {
            InputResult::Continue
        } else {
            InputResult::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(InputResult::close(), InputResult::Close);
        assert_eq!(InputResult::handled(true), InputResult::Continue);
        assert_eq!(InputResult::handled(false), InputResult::Ignored);
    }
}
