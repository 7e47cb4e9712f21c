//! Core application layer
//!
//! Routing, scrolling, popup menus, the contact form and delivery of
//! background results. NO imports from frontend/ or terminal setup code.
//! Core updates state; frontends read it and render.

pub mod app_core;
pub mod contact;
pub mod input_result;
pub mod menu;
pub mod messages;
pub mod scroll;
pub mod view;

pub use app_core::{AppCore, AppPaths};
pub use messages::AsyncEvent;
