//! Theme color definitions.

use ratatui::style::Color;

/// Application theme with semantic color assignments.
///
/// Ten colors cover the whole UI: base, accented, selection, disabled and
/// three semantic colors for evaluation results and console levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Theme name, as shown in the header selector
    pub name: &'static str,

    /// Panel backgrounds
    pub bg: Color,
    /// Main text
    pub fg: Color,

    /// Header and status bar background
    pub accented_bg: Color,
    /// Focused borders, active divider, title and key hints
    pub accented_fg: Color,

    /// Cursor cell and header selector background
    pub selected_bg: Color,
    /// Cursor cell and header selector text
    pub selected_fg: Color,

    /// Idle borders, line numbers, timestamps
    pub disabled: Color,

    /// Successful evaluation marker, info console entries
    pub success: Color,
    /// Warn console entries
    pub warning: Color,
    /// Evaluation failures, error console entries
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        *Self::get_by_name(crate::DEFAULT_THEME)
    }
}
