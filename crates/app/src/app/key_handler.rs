use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sandbox_logger as logger;

use super::App;

impl App {
    /// Global hotkeys first, then the focused panel.
    pub(super) fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        self.state.clear_status();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') if ctrl => {
                self.state.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('l') if ctrl => {
                self.clear_console();
                return Ok(());
            }
            KeyCode::F(2) => {
                let language = self.state.cycle_language();
                self.set_language(language);
                return Ok(());
            }
            KeyCode::F(3) => {
                let name = self.state.cycle_theme();
                logger::info(format!("Theme: {}", name));
                return Ok(());
            }
            KeyCode::F(5) => {
                self.evaluate_now();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.toggle_focus();
                return Ok(());
            }
            // Tab indents in the editor
            KeyCode::Tab if self.state.focus == crate::Focus::Output => {
                self.toggle_focus();
                return Ok(());
            }
            _ => {}
        }

        let slot = self.state.focus.slot();
        let events = match self.layout.panel_mut(slot) {
            Some(panel) => panel.content_mut().handle_key(key),
            None => Vec::new(),
        };
        self.process_panel_events(events)
    }

    fn toggle_focus(&mut self) {
        self.state.focus = self.state.focus.toggle();
        self.state.needs_redraw = true;
    }
}
