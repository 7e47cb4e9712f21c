//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements:
//! event polling, rendering of the core state, and cleanup.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events converted to `FrontendEvent` (empty if the
    /// poll timed out).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state
    ///
    /// Mutable because rendering reports layout facts back to the core
    /// (viewport height, home grid columns) and tool widgets keep cursor state.
    fn render(&mut self, core: &mut AppCore) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size in cells
    fn size(&self) -> (u16, u16);
}
