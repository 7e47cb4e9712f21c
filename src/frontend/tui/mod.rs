//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for rendering and crossterm
//! for terminal management.

pub mod app;
pub mod home;
pub mod pages;
pub mod popup_menu;
pub mod progress_bar;
pub mod shell;
pub mod tool_frame;

pub use app::TuiFrontend;
