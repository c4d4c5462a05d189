//! Source editor panel for sandbox.
//!
//! A rope-backed single-buffer editor with line numbers, indentation
//! carry-over and mouse positioning.

mod buffer;
mod editor;
pub mod keyboard;
mod rendering;
mod viewport;

pub use buffer::{Cursor, TextBuffer};
pub use editor::{EditorConfig, EditorPanel};
pub use viewport::Viewport;
