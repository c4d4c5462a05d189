use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use sandbox_layout::PointerEvent;
use sandbox_logger as logger;

use super::App;
use crate::{Focus, HeaderTarget};

impl App {
    pub(super) fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(target) = self.state.header.hit(mouse.column, mouse.row) {
                    self.click_header(target);
                    return Ok(());
                }
                if self.layout.pointer_down(x, y) {
                    logger::debug(format!("Drag started at column {}", mouse.column));
                    self.state.needs_redraw = true;
                    return Ok(());
                }
                if let Some(focus) = self.layout.panel_at(x, y).and_then(Focus::from_slot) {
                    if self.state.focus != focus {
                        self.state.focus = focus;
                        self.state.needs_redraw = true;
                    }
                    self.forward_mouse(focus.slot(), mouse)?;
                }
            }
            MouseEventKind::Drag(MouseButton::Left)
            | MouseEventKind::Moved
            | MouseEventKind::Up(MouseButton::Left) => {
                let Some(event) = PointerEvent::from_mouse(&mouse) else {
                    return Ok(());
                };
                let was_dragging = self.layout.is_dragging();
                let Ok(mut document) = self.document.try_borrow_mut() else {
                    return Ok(());
                };
                if document.dispatch(&event) || was_dragging {
                    self.state.needs_redraw = true;
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(slot) = self.layout.panel_at(x, y) {
                    self.forward_mouse(slot, mouse)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn click_header(&mut self, target: HeaderTarget) {
        match target {
            HeaderTarget::Language => {
                let language = self.state.cycle_language();
                self.set_language(language);
            }
            HeaderTarget::Theme => {
                let name = self.state.cycle_theme();
                logger::info(format!("Theme: {}", name));
            }
        }
    }

    fn forward_mouse(&mut self, slot: usize, mouse: MouseEvent) -> Result<()> {
        let events = match self.layout.panel_mut(slot) {
            Some(panel) => match panel.content_area() {
                Some(area) => panel.content_mut().handle_mouse(mouse, area),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        self.process_panel_events(events)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{draw, json_app, mouse, settle};
    use super::*;
    use sandbox_core::Language;

    #[test]
    fn test_click_output_moves_focus() {
        let mut app = json_app();
        settle(&mut app);
        draw(&mut app, 81, 12);

        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 60, 5))
            .unwrap();
        assert_eq!(app.state.focus, Focus::Output);
        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5))
            .unwrap();
        assert_eq!(app.state.focus, Focus::Editor);
    }

    #[test]
    fn test_click_language_selector_cycles() {
        let mut app = json_app();
        settle(&mut app);
        draw(&mut app, 100, 12);

        let region = app.state.header.language;
        app.handle_mouse_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            region.x,
            region.y,
        ))
        .unwrap();
        assert_eq!(app.state.language, Language::JavaScript);
    }

    #[test]
    fn test_moves_without_drag_leave_widths() {
        let mut app = json_app();
        settle(&mut app);
        draw(&mut app, 81, 12);

        app.handle_mouse_event(mouse(MouseEventKind::Moved, 70, 5))
            .unwrap();
        app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 70, 5))
            .unwrap();
        assert_eq!(app.layout.width_of(0), Some(50.0));
    }
}
