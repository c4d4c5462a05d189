//! Keyboard command handling for the editor.
//!
//! Key parsing is kept apart from execution so the bindings can be tested
//! without an editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Editor command representing a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    // Navigation
    MoveCursorUp,
    MoveCursorDown,
    MoveCursorLeft,
    MoveCursorRight,
    MoveToLineStart,
    MoveToLineEnd,
    PageUp,
    PageDown,
    MoveToDocumentStart,
    MoveToDocumentEnd,

    // Text editing
    InsertChar(char),
    InsertTab,
    InsertNewline,
    Backspace,
    Delete,

    // No operation (for unhandled keys)
    None,
}

impl EditorCommand {
    /// Parse a KeyEvent into an EditorCommand.
    pub fn from_key_event(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Up, KeyModifiers::NONE) => Self::MoveCursorUp,
            (KeyCode::Down, KeyModifiers::NONE) => Self::MoveCursorDown,
            (KeyCode::Left, KeyModifiers::NONE) => Self::MoveCursorLeft,
            (KeyCode::Right, KeyModifiers::NONE) => Self::MoveCursorRight,
            (KeyCode::Home, KeyModifiers::NONE) => Self::MoveToLineStart,
            (KeyCode::End, KeyModifiers::NONE) => Self::MoveToLineEnd,
            (KeyCode::PageUp, KeyModifiers::NONE) => Self::PageUp,
            (KeyCode::PageDown, KeyModifiers::NONE) => Self::PageDown,
            (KeyCode::Home, KeyModifiers::CONTROL) => Self::MoveToDocumentStart,
            (KeyCode::End, KeyModifiers::CONTROL) => Self::MoveToDocumentEnd,

            (KeyCode::Char(ch), mods)
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Self::InsertChar(ch)
            }
            (KeyCode::Tab, KeyModifiers::NONE) => Self::InsertTab,
            (KeyCode::Enter, KeyModifiers::NONE) => Self::InsertNewline,
            (KeyCode::Backspace, KeyModifiers::NONE) => Self::Backspace,
            (KeyCode::Delete, KeyModifiers::NONE) => Self::Delete,

            _ => Self::None,
        }
    }

    /// Whether the command changes the text.
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertTab
                | Self::InsertNewline
                | Self::Backspace
                | Self::Delete
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shifted_chars_insert() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            EditorCommand::InsertChar('A')
        );
    }

    #[test]
    fn test_control_chars_are_not_text() {
        let command = EditorCommand::from_key_event(key(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(command, EditorCommand::None);
        assert!(!command.is_edit());
    }

    #[test]
    fn test_navigation_bindings() {
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::End, KeyModifiers::CONTROL)),
            EditorCommand::MoveToDocumentEnd
        );
        assert_eq!(
            EditorCommand::from_key_event(key(KeyCode::Tab, KeyModifiers::NONE)),
            EditorCommand::InsertTab
        );
        assert!(EditorCommand::InsertTab.is_edit());
        assert!(!EditorCommand::PageDown.is_edit());
    }
}
