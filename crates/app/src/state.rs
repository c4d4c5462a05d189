//! Application state.

use std::time::{Duration, Instant};

use sandbox_config::Config;
use sandbox_core::{Language, ThemeColors};
use sandbox_theme::Theme;

use crate::header::HeaderRegions;

/// Panel receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Output,
}

impl Focus {
    /// Layout slot of the focused panel.
    pub fn slot(self) -> usize {
        match self {
            Focus::Editor => 0,
            Focus::Output => 2,
        }
    }

    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Focus::Editor),
            2 => Some(Focus::Output),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Focus::Editor => Focus::Output,
            Focus::Output => Focus::Editor,
        }
    }
}

/// Global application state
#[derive(Debug)]
pub struct AppState {
    /// Should application quit
    pub should_quit: bool,
    /// Flag indicating UI needs to be redrawn
    pub needs_redraw: bool,
    /// Application configuration
    pub config: Config,
    /// Current theme
    pub theme: &'static Theme,
    /// Colors handed to panels
    pub colors: ThemeColors,
    /// Language of the editor contents
    pub language: Language,
    pub focus: Focus,
    /// Status bar message and whether it is an error
    pub status_message: Option<(String, bool)>,
    /// When the debounced evaluation is due
    pub pending_eval: Option<Instant>,
    /// Generation of the evaluation in flight
    pub running: Option<u64>,
    /// Clickable header areas from the last render
    pub header: HeaderRegions,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let theme = Theme::get_by_name(&config.general.theme);
        let language = config.general.language;
        Self {
            should_quit: false,
            needs_redraw: true,
            theme,
            colors: ThemeColors::from(theme),
            language,
            focus: Focus::default(),
            status_message: None,
            pending_eval: None,
            running: None,
            header: HeaderRegions::default(),
            config,
        }
    }

    pub fn set_theme(&mut self, name: &str) {
        self.theme = Theme::get_by_name(name);
        self.colors = ThemeColors::from(self.theme);
        self.config.general.theme = self.theme.name.to_string();
        self.needs_redraw = true;
    }

    /// Switch to the next theme in selector order.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = Theme::next_name(self.theme.name);
        self.set_theme(next);
        self.theme.name
    }

    /// Switch to the next language in selector order.
    pub fn cycle_language(&mut self) -> Language {
        self.language = self.language.next();
        self.config.general.language = self.language;
        self.needs_redraw = true;
        self.language
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), false));
        self.needs_redraw = true;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), true));
        self.needs_redraw = true;
    }

    pub fn clear_status(&mut self) {
        if self.status_message.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Restart the debounce window for an evaluation.
    pub fn schedule_eval(&mut self, now: Instant) {
        let debounce = Duration::from_millis(self.config.evaluator.debounce_ms);
        self.pending_eval = Some(now + debounce);
    }

    /// Take the pending evaluation if its debounce window has passed.
    pub fn take_due_eval(&mut self, now: Instant) -> bool {
        match self.pending_eval {
            Some(due) if now >= due => {
                self.pending_eval = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_restarts_on_each_edit() {
        let mut state = AppState::new(Config::default());
        let start = Instant::now();
        state.schedule_eval(start);
        state.schedule_eval(start + Duration::from_millis(200));

        assert!(!state.take_due_eval(start + Duration::from_millis(400)));
        assert!(state.take_due_eval(start + Duration::from_millis(500)));
        assert!(!state.take_due_eval(start + Duration::from_millis(600)));
    }

    #[test]
    fn test_cycle_theme_updates_colors_and_config() {
        let mut state = AppState::new(Config::default());
        let before = state.theme.name;
        let after = state.cycle_theme();
        assert_ne!(before, after);
        assert_eq!(state.config.general.theme, after);
        assert_eq!(state.colors.bg, Theme::get_by_name(after).bg);
    }

    #[test]
    fn test_cycle_language_wraps() {
        let mut state = AppState::new(Config::default());
        assert_eq!(state.language, Language::JavaScript);
        assert_eq!(state.cycle_language(), Language::TypeScript);
        assert_eq!(state.cycle_language(), Language::Html);
        assert_eq!(state.cycle_language(), Language::Json);
        assert_eq!(state.config.general.language, Language::Json);
    }

    #[test]
    fn test_focus_slots() {
        assert_eq!(Focus::from_slot(Focus::Output.slot()), Some(Focus::Output));
        assert_eq!(Focus::from_slot(1), None);
        assert_eq!(Focus::Editor.toggle(), Focus::Output);
    }
}
