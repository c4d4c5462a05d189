use std::time::Instant;

use anyhow::Result;
use sandbox_core::PanelEvent;
use sandbox_logger as logger;

use super::App;

impl App {
    /// Apply events emitted by a panel.
    pub(super) fn process_panel_events(&mut self, events: Vec<PanelEvent>) -> Result<()> {
        for event in events {
            match event {
                PanelEvent::NeedsRedraw => self.state.needs_redraw = true,
                PanelEvent::Quit => self.state.should_quit = true,
                PanelEvent::SourceChanged(_) => {
                    self.state.schedule_eval(Instant::now());
                    self.state.needs_redraw = true;
                }
                PanelEvent::RunNow => self.evaluate_now(),
                PanelEvent::ClearConsole => self.clear_console(),
                PanelEvent::ShowMessage(message) => self.state.set_info(message),
                PanelEvent::ShowError(message) => {
                    logger::warn(&message);
                    self.state.set_error(message);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{json_app, settle};
    use super::*;

    #[test]
    fn test_source_changed_schedules_evaluation() {
        let mut app = json_app();
        settle(&mut app);
        app.process_panel_events(vec![PanelEvent::SourceChanged("{}".into())])
            .unwrap();
        assert!(app.state.pending_eval.is_some());
    }

    #[test]
    fn test_messages_reach_status_bar() {
        let mut app = json_app();
        app.process_panel_events(vec![PanelEvent::ShowError("bad".into())])
            .unwrap();
        assert_eq!(app.state.status_message, Some(("bad".to_string(), true)));
        app.process_panel_events(vec![PanelEvent::ShowMessage("ok".into())])
            .unwrap();
        assert_eq!(app.state.status_message, Some(("ok".to_string(), false)));
    }

    #[test]
    fn test_quit_event() {
        let mut app = json_app();
        app.process_panel_events(vec![PanelEvent::Quit]).unwrap();
        assert!(app.state.should_quit);
    }
}
