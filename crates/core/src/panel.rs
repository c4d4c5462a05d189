//! Panel trait definition for sandbox panels.
//!
//! Panels are decoupled from the application state and talk back
//! through `PanelEvent`s.

use std::any::Any;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use sandbox_theme::Theme;

use crate::PanelEvent;

/// Render context passed to panels during rendering.
pub struct RenderContext<'a> {
    /// Current theme colors
    pub theme: &'a ThemeColors,
    /// Whether this panel is currently focused
    pub is_focused: bool,
}

/// Minimal theme colors needed for rendering.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub fg: Color,
    pub bg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub line_numbers: Color,
    pub cursor: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            line_numbers: Color::DarkGray,
            cursor: Color::Yellow,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }
}

impl From<&Theme> for ThemeColors {
    fn from(theme: &Theme) -> Self {
        Self {
            fg: theme.fg,
            bg: theme.bg,
            selection_bg: theme.selected_bg,
            selection_fg: theme.selected_fg,
            border: theme.disabled,
            border_focused: theme.accented_fg,
            line_numbers: theme.disabled,
            cursor: theme.accented_fg,
            error: theme.error,
            warning: theme.warning,
            success: theme.success,
        }
    }
}

/// Trait for all sandbox panels.
pub trait Panel: Any {
    /// Unique name for panel identification.
    fn name(&self) -> &'static str;

    /// Dynamic title for display in the panel border.
    fn title(&self) -> String;

    /// Render the panel content into the area inside the border.
    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &RenderContext);

    /// Handle keyboard input.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent>;

    /// Handle mouse input. `area` is the content area last rendered.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> Vec<PanelEvent> {
        let _ = (event, area);
        vec![]
    }

    /// Downcast to concrete type (immutable).
    fn as_any(&self) -> &dyn Any;

    /// Downcast to concrete type (mutable).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
