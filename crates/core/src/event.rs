//! Event types for the sandbox application.
//!
//! This module provides:
//! - `Event` - terminal events (keyboard, mouse, resize, tick)
//! - `EventHandler` - polling for terminal events
//! - `PanelEvent` - events emitted by panels to communicate with the application

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Application event
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard event
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Tick event (debounced evaluation, worker polling)
    Tick,
    /// Terminal focus lost event
    FocusLost,
}

/// Event handler for polling terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait for next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Release and Repeat arrive with the kitty keyboard protocol
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Key(_) => Ok(Event::Tick),
                CrosstermEvent::Mouse(mouse) => Ok(Event::Mouse(mouse)),
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                CrosstermEvent::FocusLost => Ok(Event::FocusLost),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

/// Events emitted by panels to communicate with the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Request a UI redraw
    NeedsRedraw,

    /// Request application quit
    Quit,

    /// Editor content changed; carries the full new source
    SourceChanged(String),

    /// Request an immediate evaluation of the current source
    RunNow,

    /// Clear the captured console log
    ClearConsole,

    /// Show an informational message in the status bar
    ShowMessage(String),

    /// Show an error message in the status bar
    ShowError(String),
}
