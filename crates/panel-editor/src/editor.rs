use std::any::Any;

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect};
use sandbox_config::EditorSettings;
use sandbox_core::{Language, Panel, PanelEvent, RenderContext};

use crate::buffer::{Cursor, TextBuffer};
use crate::keyboard::EditorCommand;
use crate::rendering::{self, EditorView};
use crate::viewport::Viewport;

/// Lines moved per wheel notch.
const SCROLL_LINES: usize = 3;

/// Editor behaviour taken from the `[editor]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub show_line_numbers: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::from(&EditorSettings::default())
    }
}

impl From<&EditorSettings> for EditorConfig {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            tab_size: settings.tab_size.max(1),
            show_line_numbers: settings.show_line_numbers,
        }
    }
}

/// Source editor panel.
///
/// Every edit reports the whole source through
/// [`PanelEvent::SourceChanged`]; evaluation is the application's business.
pub struct EditorPanel {
    config: EditorConfig,
    buffer: TextBuffer,
    cursor: Cursor,
    /// Column kept across vertical moves
    preferred_column: Option<usize>,
    viewport: Viewport,
    language: Language,
}

impl EditorPanel {
    pub fn new(config: EditorConfig, language: Language) -> Self {
        Self::with_text("", config, language)
    }

    pub fn with_text(text: &str, config: EditorConfig, language: Language) -> Self {
        Self {
            config,
            buffer: TextBuffer::from_text(text),
            cursor: Cursor::default(),
            preferred_column: None,
            viewport: Viewport::default(),
            language,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    fn gutter(&self) -> u16 {
        rendering::gutter_width(self.buffer.line_count(), self.config.show_line_numbers)
    }

    fn max_line(&self) -> usize {
        self.buffer.line_count().saturating_sub(1)
    }

    fn clamp_cursor(&mut self) {
        self.cursor.line = self.cursor.line.min(self.max_line());
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.clamp_column(line_len);
    }

    fn move_vertically(&mut self, up: bool, lines: usize) {
        let column = *self.preferred_column.get_or_insert(self.cursor.column);
        if up {
            self.cursor.move_up(lines);
        } else {
            let max_line = self.max_line();
            self.cursor.move_down(lines, max_line);
        }
        self.cursor.column = column;
        self.clamp_cursor();
    }

    fn page_size(&self) -> usize {
        self.viewport.height.saturating_sub(1).max(1)
    }

    /// Run one command. Returns true if the text changed.
    fn execute(&mut self, command: EditorCommand) -> Result<bool> {
        if !matches!(
            command,
            EditorCommand::MoveCursorUp
                | EditorCommand::MoveCursorDown
                | EditorCommand::PageUp
                | EditorCommand::PageDown
        ) {
            self.preferred_column = None;
        }

        match command {
            EditorCommand::MoveCursorUp => self.move_vertically(true, 1),
            EditorCommand::MoveCursorDown => self.move_vertically(false, 1),
            EditorCommand::PageUp => self.move_vertically(true, self.page_size()),
            EditorCommand::PageDown => self.move_vertically(false, self.page_size()),
            EditorCommand::MoveCursorLeft => {
                if self.cursor.column > 0 {
                    self.cursor.column -= 1;
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.column = self.buffer.line_len(self.cursor.line);
                }
            }
            EditorCommand::MoveCursorRight => {
                if self.cursor.column < self.buffer.line_len(self.cursor.line) {
                    self.cursor.column += 1;
                } else if self.cursor.line < self.max_line() {
                    self.cursor = Cursor::at(self.cursor.line + 1, 0);
                }
            }
            EditorCommand::MoveToLineStart => self.cursor.column = 0,
            EditorCommand::MoveToLineEnd => {
                self.cursor.column = self.buffer.line_len(self.cursor.line);
            }
            EditorCommand::MoveToDocumentStart => self.cursor = Cursor::default(),
            EditorCommand::MoveToDocumentEnd => {
                let line = self.max_line();
                self.cursor = Cursor::at(line, self.buffer.line_len(line));
            }
            EditorCommand::InsertChar(ch) => {
                let mut text = [0u8; 4];
                self.cursor = self.buffer.insert(&self.cursor, ch.encode_utf8(&mut text))?;
            }
            EditorCommand::InsertTab => {
                let width = self.config.tab_size - self.cursor.column % self.config.tab_size;
                self.cursor = self.buffer.insert(&self.cursor, &" ".repeat(width))?;
            }
            EditorCommand::InsertNewline => {
                let indent = self.buffer.indentation(self.cursor.line);
                let indent: String = indent.chars().take(self.cursor.column).collect();
                self.cursor = self
                    .buffer
                    .insert(&self.cursor, &format!("\n{}", indent))?;
            }
            EditorCommand::Backspace => match self.buffer.backspace(&self.cursor)? {
                Some(cursor) => self.cursor = cursor,
                None => return Ok(false),
            },
            EditorCommand::Delete => return self.buffer.delete_char(&self.cursor),
            EditorCommand::None => return Ok(false),
        }

        Ok(command.is_edit())
    }

    /// Place the cursor under a click at (`x`, `y`) inside `area`.
    fn click(&mut self, x: u16, y: u16, area: Rect) {
        let gutter = self.gutter();
        if x < area.x + gutter || y < area.y {
            return;
        }
        let line = (self.viewport.top_line + (y - area.y) as usize).min(self.max_line());
        let text = self.buffer.line(line).unwrap_or_default();
        let offset = (x - area.x - gutter) as usize;
        let column = rendering::column_at_offset(&text, self.viewport.left_column, offset);

        self.cursor = Cursor::at(line, column);
        self.preferred_column = None;
        self.clamp_cursor();
    }
}

impl Panel for EditorPanel {
    fn name(&self) -> &'static str {
        "editor"
    }

    fn title(&self) -> String {
        format!(
            "Editor [{}] {}:{}",
            self.language,
            self.cursor.line + 1,
            self.cursor.column + 1
        )
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &RenderContext) {
        let gutter = self.gutter();
        self.viewport.resize(
            area.width.saturating_sub(gutter) as usize,
            area.height as usize,
        );
        self.viewport
            .ensure_cursor_visible(&self.cursor, self.buffer.line_count());

        EditorView {
            buffer: &self.buffer,
            cursor: self.cursor,
            viewport: &self.viewport,
            gutter,
            colors: ctx.theme,
            is_focused: ctx.is_focused,
        }
        .render(area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let command = EditorCommand::from_key_event(key);
        if command == EditorCommand::None {
            return vec![];
        }

        match self.execute(command) {
            Ok(true) => vec![PanelEvent::SourceChanged(self.text()), PanelEvent::NeedsRedraw],
            Ok(false) => vec![PanelEvent::NeedsRedraw],
            Err(e) => vec![PanelEvent::ShowError(e.to_string())],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> Vec<PanelEvent> {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.viewport.scroll_up(SCROLL_LINES);
                if self.cursor.line >= self.viewport.bottom_line() {
                    self.cursor.line = self.viewport.bottom_line().saturating_sub(1);
                    self.clamp_cursor();
                }
            }
            MouseEventKind::ScrollDown => {
                self.viewport
                    .scroll_down(SCROLL_LINES, self.buffer.line_count());
                if self.cursor.line < self.viewport.top_line {
                    self.cursor.line = self.viewport.top_line;
                    self.clamp_cursor();
                }
            }
            MouseEventKind::Down(MouseButton::Left) => self.click(event.column, event.row, area),
            _ => return vec![],
        }
        vec![PanelEvent::NeedsRedraw]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use sandbox_core::ThemeColors;

    fn press(editor: &mut EditorPanel, code: KeyCode) -> Vec<PanelEvent> {
        editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(editor: &mut EditorPanel, text: &str) {
        for ch in text.chars() {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            press(editor, code);
        }
    }

    fn render(editor: &mut EditorPanel, area: Rect) -> Buffer {
        let colors = ThemeColors::default();
        let ctx = RenderContext {
            theme: &colors,
            is_focused: true,
        };
        let mut buf = Buffer::empty(area);
        editor.render(area, &mut buf, &ctx);
        buf
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_edits_emit_source_changed() {
        let mut editor = EditorPanel::new(EditorConfig::default(), Language::JavaScript);
        let events = press(&mut editor, KeyCode::Char('1'));
        assert_eq!(
            events,
            vec![PanelEvent::SourceChanged("1".to_string()), PanelEvent::NeedsRedraw]
        );

        let events = press(&mut editor, KeyCode::Left);
        assert_eq!(events, vec![PanelEvent::NeedsRedraw]);
    }

    #[test]
    fn test_newline_carries_indentation() {
        let mut editor = EditorPanel::new(EditorConfig::default(), Language::JavaScript);
        type_text(&mut editor, "if (a) {\n");
        press(&mut editor, KeyCode::Tab);
        type_text(&mut editor, "b();\nc();");
        assert_eq!(editor.text(), "if (a) {\n  b();\n  c();");
        assert_eq!(editor.cursor(), Cursor::at(2, 6));
    }

    #[test]
    fn test_tab_aligns_to_tab_stops() {
        let config = EditorConfig {
            tab_size: 4,
            show_line_numbers: true,
        };
        let mut editor = EditorPanel::with_text("a", config, Language::TypeScript);
        press(&mut editor, KeyCode::End);
        press(&mut editor, KeyCode::Tab);
        assert_eq!(editor.text(), "a   ");
    }

    #[test]
    fn test_backspace_at_start_changes_nothing() {
        let mut editor = EditorPanel::with_text("x", EditorConfig::default(), Language::Json);
        assert_eq!(press(&mut editor, KeyCode::Backspace), vec![PanelEvent::NeedsRedraw]);
        press(&mut editor, KeyCode::Delete);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_vertical_moves_keep_preferred_column() {
        let mut editor =
            EditorPanel::with_text("abcdef\nab\nabcdef", EditorConfig::default(), Language::Html);
        for _ in 0..5 {
            press(&mut editor, KeyCode::Right);
        }
        press(&mut editor, KeyCode::Down);
        assert_eq!(editor.cursor(), Cursor::at(1, 2));
        press(&mut editor, KeyCode::Down);
        assert_eq!(editor.cursor(), Cursor::at(2, 5));
    }

    #[test]
    fn test_right_wraps_to_next_line() {
        let mut editor = EditorPanel::with_text("a\nb", EditorConfig::default(), Language::Json);
        press(&mut editor, KeyCode::Right);
        press(&mut editor, KeyCode::Right);
        assert_eq!(editor.cursor(), Cursor::at(1, 0));
        press(&mut editor, KeyCode::Left);
        assert_eq!(editor.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_click_positions_cursor_after_gutter() {
        let mut editor =
            EditorPanel::with_text("first\nsecond", EditorConfig::default(), Language::JavaScript);
        let area = Rect::new(10, 5, 20, 4);
        render(&mut editor, area);

        // gutter is 4 columns wide, so x = 10 + 4 + 3 is column 3
        editor.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 17, 6), area);
        assert_eq!(editor.cursor(), Cursor::at(1, 3));

        // past the end of the line clamps
        editor.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 29, 5), area);
        assert_eq!(editor.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_wheel_scrolls_and_drags_cursor_along() {
        let text = (1..=20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut editor = EditorPanel::with_text(&text, EditorConfig::default(), Language::Json);
        let area = Rect::new(0, 0, 20, 5);
        render(&mut editor, area);

        editor.handle_mouse(mouse(MouseEventKind::ScrollDown, 1, 1), area);
        assert_eq!(editor.viewport.top_line, 3);
        assert_eq!(editor.cursor().line, 3);

        let buf = render(&mut editor, area);
        assert_eq!(buf.cell((2, 0)).map(|c| c.symbol()), Some("4"));
    }

    #[test]
    fn test_title_shows_language_and_position() {
        let mut editor = EditorPanel::new(EditorConfig::default(), Language::TypeScript);
        type_text(&mut editor, "ab");
        assert_eq!(editor.title(), "Editor [typescript] 1:3");
        editor.set_language(Language::Json);
        assert!(editor.title().starts_with("Editor [json]"));
    }
}
