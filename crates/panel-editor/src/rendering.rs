//! Drawing the visible part of the buffer.

use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::{Color, Modifier, Style},
};
use sandbox_core::ThemeColors;
use unicode_width::UnicodeWidthChar;

use crate::buffer::{Cursor, TextBuffer};
use crate::viewport::Viewport;

/// Minimum digits reserved for line numbers.
const MIN_LINE_NUMBER_DIGITS: usize = 3;

/// Gutter width (digits plus one space), or 0 when line numbers are off.
pub fn gutter_width(line_count: usize, show_line_numbers: bool) -> u16 {
    if !show_line_numbers {
        return 0;
    }
    let digits = line_count.to_string().len().max(MIN_LINE_NUMBER_DIGITS);
    (digits + 1) as u16
}

/// Display width of a char in the editor (tabs and controls take one cell).
pub fn char_width(ch: char) -> usize {
    if ch == '\t' {
        return 1;
    }
    ch.width().unwrap_or(1)
}

/// Char column under screen offset `x` of a line scrolled to `left_column`.
pub fn column_at_offset(line: &str, left_column: usize, x: usize) -> usize {
    let mut used = 0;
    let mut column = left_column;
    for ch in line.chars().skip(left_column) {
        let width = char_width(ch);
        if used + width > x {
            return column;
        }
        used += width;
        column += 1;
    }
    column
}

pub struct EditorView<'a> {
    pub buffer: &'a TextBuffer,
    pub cursor: Cursor,
    pub viewport: &'a Viewport,
    pub gutter: u16,
    pub colors: &'a ThemeColors,
    pub is_focused: bool,
}

impl EditorView<'_> {
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let text_style = Style::default().fg(self.colors.fg).bg(self.colors.bg);
        let number_style = Style::default()
            .fg(self.colors.line_numbers)
            .bg(self.colors.bg);
        let current_number_style = number_style.fg(self.colors.fg);

        let text_x = area.x + self.gutter.min(area.width);
        let text_width = area.width.saturating_sub(self.gutter);

        for row in 0..area.height {
            let line_idx = self.viewport.top_line + row as usize;
            let y = area.y + row;
            let Some(line) = self.buffer.line(line_idx) else {
                break;
            };

            if self.gutter > 0 {
                let style = if line_idx == self.cursor.line {
                    current_number_style
                } else {
                    number_style
                };
                let digits = self.gutter as usize - 1;
                let label = format!("{:>width$} ", line_idx + 1, width = digits);
                buf.set_stringn(area.x, y, label, area.width as usize, style);
            }

            let mut x = 0usize;
            for ch in line.chars().skip(self.viewport.left_column) {
                let width = char_width(ch);
                if x + width > text_width as usize {
                    break;
                }
                if let Some(cell) = buf.cell_mut((text_x + x as u16, y)) {
                    let symbol = if ch == '\t' || ch.is_control() { ' ' } else { ch };
                    cell.set_char(symbol).set_style(text_style);
                }
                x += width;
            }
        }

        if self.is_focused {
            if let Some((x, y)) = self.cursor_position(area) {
                render_cursor_at(buf, x, y, area, self.colors);
            }
        }
    }

    /// Screen position of the cursor, if it is inside the text area.
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        if self.cursor.line < self.viewport.top_line || self.cursor.column < self.viewport.left_column
        {
            return None;
        }
        let row = self.cursor.line - self.viewport.top_line;
        if row >= area.height as usize {
            return None;
        }
        let line = self.buffer.line(self.cursor.line).unwrap_or_default();
        let offset: usize = line
            .chars()
            .skip(self.viewport.left_column)
            .take(self.cursor.column - self.viewport.left_column)
            .map(char_width)
            .sum();
        let text_width = area.width.saturating_sub(self.gutter) as usize;
        if offset >= text_width {
            return None;
        }
        Some((area.x + self.gutter + offset as u16, area.y + row as u16))
    }
}

/// Render cursor by inverting cell colors at the given position.
pub fn render_cursor_at(buf: &mut Buffer, x: u16, y: u16, area: Rect, colors: &ThemeColors) {
    if x < area.x + area.width && y < area.y + area.height {
        if let Some(cell) = buf.cell_mut((x, y)) {
            invert_cell_colors(cell, colors);
        }
    }
}

fn invert_cell_colors(cell: &mut Cell, colors: &ThemeColors) {
    let current_fg = match cell.fg {
        Color::Reset => colors.fg,
        color => color,
    };
    let current_bg = match cell.bg {
        Color::Reset => colors.bg,
        color => color,
    };

    cell.set_style(
        Style::default()
            .bg(current_fg)
            .fg(current_bg)
            .add_modifier(Modifier::BOLD),
    );
}
