use crate::buffer::Cursor;

/// Visible window onto the document
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    /// First visible line (0-based)
    pub top_line: usize,
    /// Number of visible lines
    pub height: usize,
    /// Horizontal scroll (left column)
    pub left_column: usize,
    /// Width of visible area
    pub width: usize,
}

impl Viewport {
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Index of last visible line (exclusive)
    pub fn bottom_line(&self) -> usize {
        self.top_line + self.height
    }

    /// Index of last visible column (exclusive)
    pub fn right_column(&self) -> usize {
        self.left_column + self.width
    }

    /// Scroll so that `cursor` is on screen.
    pub fn ensure_cursor_visible(&mut self, cursor: &Cursor, total_lines: usize) {
        if self.height == 0 || self.width == 0 {
            return;
        }

        if cursor.line < self.top_line {
            self.top_line = cursor.line;
        } else if cursor.line >= self.bottom_line() {
            self.top_line = cursor.line + 1 - self.height;
        }
        let max_top = total_lines.saturating_sub(self.height);
        self.top_line = self.top_line.min(max_top);

        if cursor.column < self.left_column {
            self.left_column = cursor.column;
        } else if cursor.column >= self.right_column() {
            self.left_column = cursor.column + 1 - self.width;
        }
    }

    pub fn scroll_up(&mut self, lines: usize) -> bool {
        if self.top_line == 0 {
            return false;
        }
        self.top_line = self.top_line.saturating_sub(lines);
        true
    }

    pub fn scroll_down(&mut self, lines: usize, total_lines: usize) -> bool {
        let max_top = total_lines.saturating_sub(self.height);
        if self.top_line >= max_top {
            return false;
        }
        self.top_line = (self.top_line + lines).min(max_top);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: usize, height: usize) -> Viewport {
        let mut viewport = Viewport::default();
        viewport.resize(width, height);
        viewport
    }

    #[test]
    fn test_scrolls_down_to_cursor() {
        let mut vp = viewport(10, 5);
        vp.ensure_cursor_visible(&Cursor::at(7, 0), 20);
        assert_eq!(vp.top_line, 3);
        assert_eq!(vp.bottom_line(), 8);
    }

    #[test]
    fn test_scrolls_right_to_cursor() {
        let mut vp = viewport(10, 5);
        vp.ensure_cursor_visible(&Cursor::at(0, 15), 1);
        assert_eq!(vp.left_column, 6);
        vp.ensure_cursor_visible(&Cursor::at(0, 2), 1);
        assert_eq!(vp.left_column, 2);
    }

    #[test]
    fn test_scroll_limits() {
        let mut vp = viewport(10, 5);
        assert!(!vp.scroll_up(3));
        assert!(vp.scroll_down(3, 6));
        assert_eq!(vp.top_line, 1);
        assert!(!vp.scroll_down(3, 6));
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut vp = Viewport::default();
        vp.ensure_cursor_visible(&Cursor::at(4, 4), 10);
        assert_eq!(vp.top_line, 0);
        assert_eq!(vp.left_column, 0);
    }
}
