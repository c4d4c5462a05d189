use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Layout},
    style::Style,
    Frame, Terminal,
};
use sandbox_config::{constants, Config};
use sandbox_console::ConsoleSink;
use sandbox_core::{Event, EventHandler, Language};
use sandbox_eval::{EvalOutcome, EvalWorker};
use sandbox_layout::{Divider, Panel, PointerDocument, SharedDocument, SplitLayout};
use sandbox_logger as logger;
use sandbox_panel_editor::{EditorConfig, EditorPanel};
use sandbox_panel_output::OutputPanel;

use crate::header::render_header;
use crate::state::{AppState, Focus};
use crate::status_bar::StatusBar;

mod event_handler;
mod key_handler;
mod mouse_handler;

/// Main application
pub struct App {
    state: AppState,
    layout: SplitLayout,
    document: SharedDocument,
    console: ConsoleSink,
    worker: Option<EvalWorker>,
    event_handler: EventHandler,
    /// Console revision already drawn
    seen_console_revision: u64,
}

impl App {
    /// Initialize the global logger from the `[logging]` config section.
    pub fn init_logging(config: &Config) {
        let file_path = match &config.logging.file_path {
            Some(path) => Some(PathBuf::from(path)),
            None => Config::default_log_path().ok(),
        };
        let min_level = config
            .logging
            .min_level
            .parse()
            .unwrap_or(logger::LogLevel::Info);
        logger::init(file_path, constants::MAX_LOG_ENTRIES, min_level);
        logger::info("Application started");
    }

    /// Create the application and queue the starter snippet for evaluation.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        let console = ConsoleSink::new(state.config.console.max_entries);
        let document = PointerDocument::shared();

        let starter = starter_source(&state.config, state.language);
        let editor = EditorPanel::with_text(
            &starter,
            EditorConfig::from(&state.config.editor),
            state.language,
        );
        let output = OutputPanel::new(console.clone());
        let layout = SplitLayout::mount(
            vec![
                Panel::new(Box::new(editor)).into(),
                Divider::new()
                    .symbol(state.config.layout.divider_symbol.clone())
                    .into(),
                Panel::new(Box::new(output)).into(),
            ],
            document.clone(),
        );

        let worker = match EvalWorker::spawn(state.config.evaluator.clone(), console.clone()) {
            Ok(worker) => Some(worker),
            Err(e) => {
                logger::error(format!("Failed to start evaluation worker: {:#}", e));
                state.set_error(format!("Evaluation unavailable: {}", e));
                None
            }
        };

        let mut app = Self {
            state,
            layout,
            document,
            console,
            worker,
            event_handler: EventHandler::new(Duration::from_millis(
                constants::EVENT_HANDLER_INTERVAL_MS,
            )),
            seen_console_revision: 0,
        };
        app.evaluate_now();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.state.should_quit {
            if self.state.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.state.needs_redraw = false;
            }

            let event = self.event_handler.next()?;
            self.handle_event(event)?;
        }

        logger::info("Application exiting");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
            Event::Resize(_, _) => self.state.needs_redraw = true,
            // A drag stays live until the next pointer-up, wherever it lands
            Event::FocusLost => {}
            Event::Tick => self.on_tick(Instant::now()),
        }
        Ok(())
    }

    /// Periodic work: debounced evaluation, worker results, console changes.
    fn on_tick(&mut self, now: Instant) {
        if self.state.take_due_eval(now) {
            self.evaluate_now();
        }
        self.poll_worker();

        let revision = self.console.revision();
        if revision != self.seen_console_revision {
            self.seen_console_revision = revision;
            self.state.needs_redraw = true;
        }
    }

    /// Submit the current source, skipping any pending debounce.
    fn evaluate_now(&mut self) {
        self.state.pending_eval = None;
        let source = self.editor().map(|e| e.text()).unwrap_or_default();
        let language = self.state.language;
        match self.worker.as_mut() {
            Some(worker) => {
                let generation = worker.submit(language, source);
                self.state.running = Some(generation);
                self.state.needs_redraw = true;
            }
            None => self.state.set_error("Evaluation unavailable"),
        }
    }

    fn poll_worker(&mut self) {
        let Some(response) = self.worker.as_mut().and_then(|w| w.try_recv()) else {
            return;
        };
        if let EvalOutcome::Failure { message, .. } = &response.outcome {
            logger::debug(format!(
                "Evaluation #{} failed: {}",
                response.generation, message
            ));
        }
        if let Some(output) = self.output_mut() {
            output.set_outcome(&response.outcome, Some(response.elapsed));
        }
        self.state.running = None;
        self.state.needs_redraw = true;
    }

    fn set_language(&mut self, language: Language) {
        if let Some(editor) = self.editor_mut() {
            editor.set_language(language);
        }
        logger::info(format!("Language: {}", language));
        self.evaluate_now();
    }

    fn clear_console(&mut self) {
        self.console.clear();
        self.state.set_info("Console cleared");
    }

    fn editor(&self) -> Option<&EditorPanel> {
        self.layout
            .panel(Focus::Editor.slot())
            .and_then(|p| p.content().as_any().downcast_ref::<EditorPanel>())
    }

    fn editor_mut(&mut self) -> Option<&mut EditorPanel> {
        self.layout
            .panel_mut(Focus::Editor.slot())
            .and_then(|p| p.content_mut().as_any_mut().downcast_mut::<EditorPanel>())
    }

    fn output_mut(&mut self) -> Option<&mut OutputPanel> {
        self.layout
            .panel_mut(Focus::Output.slot())
            .and_then(|p| p.content_mut().as_any_mut().downcast_mut::<OutputPanel>())
    }

    /// Right-hand status text: run state or the current split.
    fn status_right(&self) -> String {
        if self.state.running.is_some() {
            return "● running".to_string();
        }
        let share = |slot| self.layout.width_of(slot).unwrap_or(0.0);
        format!(
            "{:.0}% │ {:.0}%",
            share(Focus::Editor.slot()),
            share(Focus::Output.slot())
        )
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let right = self.status_right();
        let buf = frame.buffer_mut();
        buf.set_style(
            area,
            Style::default()
                .fg(self.state.colors.fg)
                .bg(self.state.colors.bg),
        );

        self.state.header = render_header(buf, header, &self.state);
        self.layout.render(
            body,
            buf,
            &self.state.colors,
            Some(self.state.focus.slot()),
        );
        StatusBar::render(buf, status, &self.state, &right);
    }
}

/// Initial editor contents: the editor settings as an object literal.
fn starter_source(config: &Config, language: Language) -> String {
    let settings = serde_json::to_string_pretty(&config.editor).unwrap_or_else(|_| "{}".into());
    match language {
        Language::Json => settings,
        Language::JavaScript | Language::TypeScript => format!("({});\n", settings),
        Language::Html => "<h1>Hello</h1>\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::backend::TestBackend;

    pub(super) fn json_app() -> App {
        let mut config = Config::default();
        config.general.language = Language::Json;
        config.evaluator.debounce_ms = 0;
        App::new(config)
    }

    pub(super) fn draw(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
    }

    pub(super) fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    pub(super) fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Tick until the worker answers.
    pub(super) fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            app.on_tick(Instant::now());
            if app.state.running.is_none() && app.state.pending_eval.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("evaluation did not finish within 5s");
    }

    #[test]
    fn test_starter_snippet_is_evaluated() {
        let mut app = json_app();
        assert!(app.state.running.is_some());
        settle(&mut app);

        let output = app.output_mut().unwrap();
        assert!(output.error().is_none());
        assert!(output.value().unwrap().contains("\"tab_size\": 2"));
    }

    #[test]
    fn test_edit_then_tick_reevaluates() {
        let mut app = json_app();
        settle(&mut app);

        app.handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert!(app.state.pending_eval.is_some());
        settle(&mut app);

        let output = app.output_mut().unwrap();
        assert!(output.error().unwrap().starts_with("SyntaxError"));
    }

    #[test]
    fn test_starter_source_per_language() {
        let config = Config::default();
        assert!(starter_source(&config, Language::JavaScript).starts_with("({"));
        assert!(starter_source(&config, Language::Json).starts_with('{'));
        assert!(starter_source(&config, Language::Html).starts_with("<h1>"));
    }

    #[test]
    fn test_draw_shows_header_split_and_status() {
        let mut app = json_app();
        settle(&mut app);
        let terminal = draw(&mut app, 81, 12);
        let buffer = terminal.backend().buffer();

        let header: String = (0..81).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(header.contains("json ▾"));
        let status: String = (0..81).map(|x| buffer[(x, 11)].symbol()).collect();
        assert!(status.trim_end().ends_with("50% │ 50%"));
        // body 81 wide: panel 40, divider at column 40, panel 40
        assert_eq!(buffer[(40, 5)].symbol(), "│");
    }

    #[test]
    fn test_drag_divider_with_mouse() {
        let mut app = json_app();
        settle(&mut app);
        draw(&mut app, 81, 12);

        app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 5))
            .unwrap();
        assert!(app.layout.is_dragging());
        app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 48, 5))
            .unwrap();
        app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 48, 5))
            .unwrap();

        assert!(!app.layout.is_dragging());
        let left = app.layout.width_of(0).unwrap();
        let right = app.layout.width_of(2).unwrap();
        assert!((left - 59.876_543_209_876_54).abs() < 1e-9);
        assert!((left + right - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_survives_focus_loss_until_pointer_up() {
        let mut app = json_app();
        settle(&mut app);
        draw(&mut app, 81, 12);
        app.handle_event(Event::Mouse(mouse(
            MouseEventKind::Down(MouseButton::Left),
            40,
            5,
        )))
        .unwrap();

        app.handle_event(Event::FocusLost).unwrap();
        assert!(app.layout.is_dragging());

        app.handle_event(Event::Mouse(mouse(
            MouseEventKind::Drag(MouseButton::Left),
            48,
            5,
        )))
        .unwrap();
        assert!(app.layout.width_of(0).unwrap() > 50.0);

        // Released over the header, away from the divider
        app.handle_event(Event::Mouse(mouse(
            MouseEventKind::Up(MouseButton::Left),
            3,
            0,
        )))
        .unwrap();
        assert!(!app.layout.is_dragging());
    }
}
