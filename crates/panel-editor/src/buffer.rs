//! Rope-backed text storage and cursor positions.

use std::cmp::min;

use anyhow::{anyhow, Result};
use ropey::Rope;

/// Cursor position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Line number (0-based)
    pub line: usize,
    /// Position in line in chars (0-based)
    pub column: usize,
}

impl Cursor {
    pub fn at(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn move_up(&mut self, lines: usize) {
        self.line = self.line.saturating_sub(lines);
    }

    pub fn move_down(&mut self, lines: usize, max_line: usize) {
        self.line = min(self.line + lines, max_line);
    }

    /// Clamp column to maximum line length
    pub fn clamp_column(&mut self, max_column: usize) {
        self.column = min(self.column, max_column);
    }
}

/// Editable source text.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Number of lines (an empty buffer has one).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line text without its line break.
    pub fn line(&self, index: usize) -> Option<String> {
        if index >= self.line_count() {
            return None;
        }
        let line = self.rope.line(index).to_string();
        Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
    }

    /// Line length in chars, excluding the line break.
    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Leading spaces and tabs of `index`.
    pub fn indentation(&self, index: usize) -> String {
        self.line(index)
            .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
            .unwrap_or_default()
    }

    fn char_index(&self, cursor: &Cursor) -> Result<usize> {
        if cursor.line >= self.line_count() {
            return Err(anyhow!(
                "Line {} out of range ({} lines)",
                cursor.line,
                self.line_count()
            ));
        }
        let column = min(cursor.column, self.line_len(cursor.line));
        Ok(self.rope.line_to_char(cursor.line) + column)
    }

    /// Insert `text` at `cursor`; returns the cursor after the inserted text.
    pub fn insert(&mut self, cursor: &Cursor, text: &str) -> Result<Cursor> {
        let char_idx = self.char_index(cursor)?;
        self.rope.insert(char_idx, text);

        let end = char_idx + text.chars().count();
        let line = self.rope.char_to_line(end);
        let column = end - self.rope.line_to_char(line);
        Ok(Cursor::at(line, column))
    }

    /// Delete the char after `cursor` (joins lines at a line end).
    pub fn delete_char(&mut self, cursor: &Cursor) -> Result<bool> {
        let char_idx = self.char_index(cursor)?;
        if char_idx >= self.rope.len_chars() {
            return Ok(false);
        }
        let end = if self.rope.char(char_idx) == '\r'
            && char_idx + 1 < self.rope.len_chars()
            && self.rope.char(char_idx + 1) == '\n'
        {
            char_idx + 2
        } else {
            char_idx + 1
        };
        self.rope.remove(char_idx..end);
        Ok(true)
    }

    /// Delete the char before `cursor`; returns the new cursor.
    pub fn backspace(&mut self, cursor: &Cursor) -> Result<Option<Cursor>> {
        let char_idx = self.char_index(cursor)?;
        if char_idx == 0 {
            return Ok(None);
        }

        let column = min(cursor.column, self.line_len(cursor.line));
        let new_cursor = if column > 0 {
            Cursor::at(cursor.line, column - 1)
        } else {
            Cursor::at(cursor.line - 1, self.line_len(cursor.line - 1))
        };

        let start = if column == 0
            && self.rope.char(char_idx - 1) == '\n'
            && char_idx >= 2
            && self.rope.char(char_idx - 2) == '\r'
        {
            char_idx - 2
        } else {
            char_idx - 1
        };
        self.rope.remove(start..char_idx);
        Ok(Some(new_cursor))
    }
}
