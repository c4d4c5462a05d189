use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::state::AppState;

const KEY_HINTS: &[(&str, &str)] = &[
    ("F2", "Language"),
    ("F3", "Theme"),
    ("F5", "Run"),
    ("^L", "Clear"),
    ("⇧Tab", "Focus"),
    ("^Q", "Quit"),
];

/// Status bar at the bottom of screen
pub struct StatusBar;

impl StatusBar {
    /// Render status bar. `right` is drawn right-aligned (layout widths, run state).
    pub fn render(buf: &mut Buffer, area: Rect, state: &AppState, right: &str) {
        if area.height == 0 {
            return;
        }
        let theme = state.theme;
        let base_style = Style::default().fg(theme.disabled).bg(theme.accented_bg);
        let highlight_style = Style::default()
            .fg(theme.accented_fg)
            .bg(theme.accented_bg)
            .add_modifier(Modifier::BOLD);

        // Fill entire line with background color from theme
        buf.set_style(area, base_style);

        let spans: Vec<Span> = match &state.status_message {
            Some((message, true)) => vec![Span::styled(
                format!(" {} ", message),
                Style::default()
                    .fg(theme.error)
                    .bg(theme.accented_bg)
                    .add_modifier(Modifier::BOLD),
            )],
            Some((message, false)) => vec![Span::styled(
                format!(" {} ", message),
                base_style.fg(theme.fg),
            )],
            None => {
                let mut spans = vec![Span::styled(" ", base_style)];
                for (key, action) in KEY_HINTS {
                    spans.push(Span::styled(*key, highlight_style));
                    spans.push(Span::styled(format!(" {}  ", action), base_style));
                }
                spans
            }
        };

        let right_width = right.width() as u16 + 1;
        let left_width = area.width.saturating_sub(right_width);
        buf.set_line(area.x, area.y, &Line::from(spans), left_width);

        if right_width <= area.width {
            buf.set_stringn(
                area.right() - right_width,
                area.y,
                right,
                right_width as usize,
                highlight_style,
            );
        }
    }
}
