//! Core types and traits for sandbox panels.
//!
//! This crate provides the foundational abstractions shared by the layout,
//! the panels and the application without coupling them to each other.

pub mod event;
pub mod language;
pub mod panel;

pub use event::{Event, EventHandler, PanelEvent};
pub use language::Language;
pub use panel::{Panel, RenderContext, ThemeColors};

// Re-export theme for convenience
pub use sandbox_theme::Theme;
