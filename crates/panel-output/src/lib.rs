//! Output panel for sandbox.
//!
//! Shows the outcome of the latest evaluation above the captured console
//! log:
//! - the value, or the error message and trace in the error color
//! - console entries colored by level
//! - auto-scroll to new console entries

use std::any::Any;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use sandbox_console::{ConsoleLevel, ConsoleSink};
use sandbox_core::{Panel, PanelEvent, RenderContext, ThemeColors};
use sandbox_eval::EvalOutcome;

/// Lines moved per wheel notch.
const SCROLL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Value,
    Error,
    Separator,
    Console(ConsoleLevel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputLine {
    kind: LineKind,
    text: String,
}

/// Evaluation result and console log viewer.
pub struct OutputPanel {
    console: ConsoleSink,
    /// Text of the value currently shown (kept when a run yields undefined)
    value: Option<String>,
    /// Error of the latest run, replacing the value while present
    error: Option<String>,
    elapsed: Option<Duration>,
    /// First visible line
    scroll: usize,
    /// Follow new console entries
    auto_scroll: bool,
    /// Console revision already turned into lines
    last_revision: Option<u64>,
    lines: Vec<OutputLine>,
    /// Height of the last render
    content_height: usize,
}

impl OutputPanel {
    pub fn new(console: ConsoleSink) -> Self {
        Self {
            console,
            value: None,
            error: None,
            elapsed: None,
            scroll: 0,
            auto_scroll: true,
            last_revision: None,
            lines: Vec::new(),
            content_height: 0,
        }
    }

    /// Show the outcome of a finished evaluation.
    pub fn set_outcome(&mut self, outcome: &EvalOutcome, elapsed: Option<Duration>) {
        match outcome {
            EvalOutcome::Success { value: Some(_) } => {
                self.value = Some(outcome.display_text(None));
                self.error = None;
            }
            // undefined keeps the previous value visible
            EvalOutcome::Success { value: None } => self.error = None,
            EvalOutcome::Failure { .. } => {
                self.error = Some(outcome.display_text(self.value.as_deref()));
            }
        }
        self.elapsed = elapsed;
        self.last_revision = None;
    }

    /// Forget the shown value and error.
    pub fn reset(&mut self) {
        self.value = None;
        self.error = None;
        self.elapsed = None;
        self.last_revision = None;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn console(&self) -> &ConsoleSink {
        &self.console
    }

    /// Rebuild lines when the console or outcome changed.
    fn sync_lines(&mut self) {
        let revision = self.console.revision();
        if self.last_revision == Some(revision) {
            return;
        }

        let mut lines = Vec::new();
        match (&self.error, &self.value) {
            (Some(error), _) => push_lines(&mut lines, LineKind::Error, error),
            (None, Some(value)) => push_lines(&mut lines, LineKind::Value, value),
            (None, None) => push_lines(&mut lines, LineKind::Value, "undefined"),
        }

        let entries = self.console.entries();
        lines.push(OutputLine {
            kind: LineKind::Separator,
            text: format!("── console ({}) ──", entries.len()),
        });
        for entry in &entries {
            push_lines(&mut lines, LineKind::Console(entry.level), &entry.to_line());
        }

        self.lines = lines;
        self.last_revision = Some(revision);
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.content_height)
    }

    fn scroll_up(&mut self, lines: usize) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
        if self.scroll >= self.max_scroll() {
            self.auto_scroll = true;
        }
    }

    fn style_for(kind: LineKind, colors: &ThemeColors) -> Style {
        let base = Style::default().bg(colors.bg);
        match kind {
            LineKind::Value => base.fg(colors.fg),
            LineKind::Error => base.fg(colors.error),
            LineKind::Separator => base.fg(colors.line_numbers).add_modifier(Modifier::DIM),
            LineKind::Console(level) => base.fg(level_color(level, colors)),
        }
    }
}

fn level_color(level: ConsoleLevel, colors: &ThemeColors) -> Color {
    match level {
        ConsoleLevel::Error => colors.error,
        ConsoleLevel::Warn => colors.warning,
        ConsoleLevel::Info => colors.success,
        ConsoleLevel::Debug | ConsoleLevel::Trace => colors.line_numbers,
        ConsoleLevel::Log => colors.fg,
    }
}

fn push_lines(lines: &mut Vec<OutputLine>, kind: LineKind, text: &str) {
    if text.is_empty() {
        lines.push(OutputLine {
            kind,
            text: String::new(),
        });
        return;
    }
    lines.extend(text.lines().map(|line| OutputLine {
        kind,
        text: line.to_string(),
    }));
}

impl Panel for OutputPanel {
    fn name(&self) -> &'static str {
        "output"
    }

    fn title(&self) -> String {
        let status = if self.error.is_some() { " (error)" } else { "" };
        match self.elapsed {
            Some(elapsed) => format!("Output{} {} ms", status, elapsed.as_millis()),
            None => format!("Output{}", status),
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &RenderContext) {
        self.sync_lines();
        self.content_height = area.height as usize;

        if self.auto_scroll {
            self.scroll = self.max_scroll();
        } else {
            self.scroll = self.scroll.min(self.max_scroll());
        }

        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(self.content_height)
            .map(|line| {
                Line::from(Span::styled(
                    line.text.clone(),
                    Self::style_for(line.kind, ctx.theme),
                ))
            })
            .collect();

        Paragraph::new(lines)
            .style(Style::default().fg(ctx.theme.fg).bg(ctx.theme.bg))
            .render(area, buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let page = self.content_height.saturating_sub(1).max(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::PageUp => self.scroll_up(page),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_up(self.scroll),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageDown => self.scroll_down(page),
            KeyCode::End | KeyCode::Char('G') => {
                self.auto_scroll = true;
                self.scroll = self.max_scroll();
            }
            _ => return vec![],
        }
        vec![PanelEvent::NeedsRedraw]
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, _area: Rect) -> Vec<PanelEvent> {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(SCROLL_LINES),
            MouseEventKind::ScrollDown => self.scroll_down(SCROLL_LINES),
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
    use crossterm::event::KeyModifiers;

    fn render(panel: &mut OutputPanel, area: Rect) -> Buffer {
        let colors = ThemeColors::default();
        let ctx = RenderContext {
            theme: &colors,
            is_focused: false,
        };
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf, &ctx);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        let width = buf.area.width;
        (0..width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn press(panel: &mut OutputPanel, code: KeyCode) {
        panel.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_undefined_keeps_previous_value() {
        let mut panel = OutputPanel::new(ConsoleSink::new(10));
        panel.set_outcome(&EvalOutcome::value("42"), None);
        panel.set_outcome(&EvalOutcome::undefined(), None);
        assert_eq!(panel.value(), Some("42"));
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn test_error_replaces_value_until_next_success() {
        let mut panel = OutputPanel::new(ConsoleSink::new(10));
        panel.set_outcome(&EvalOutcome::value("1"), Some(Duration::from_millis(7)));
        panel.set_outcome(&EvalOutcome::failure("SyntaxError: nope"), None);
        assert_eq!(panel.error(), Some("SyntaxError: nope"));
        assert_eq!(panel.title(), "Output (error)");

        let buf = render(&mut panel, Rect::new(0, 0, 30, 4));
        assert_eq!(row_text(&buf, 0), "SyntaxError: nope");
        assert_eq!(buf.cell((0, 0)).map(|c| c.fg), Some(ThemeColors::default().error));

        panel.set_outcome(&EvalOutcome::undefined(), Some(Duration::from_millis(3)));
        assert_eq!(panel.error(), None);
        assert_eq!(panel.value(), Some("1"));
        assert_eq!(panel.title(), "Output 3 ms");
    }

    #[test]
    fn test_console_entries_follow_the_value() {
        let console = ConsoleSink::new(10);
        let mut panel = OutputPanel::new(console.clone());
        panel.set_outcome(&EvalOutcome::value("{\n  \"a\": 1\n}"), None);
        console.record_text(ConsoleLevel::Warn, "careful");

        let buf = render(&mut panel, Rect::new(0, 0, 60, 6));
        assert_eq!(row_text(&buf, 0), "{");
        assert_eq!(row_text(&buf, 2), "}");
        assert_eq!(row_text(&buf, 3), "── console (1) ──");
        assert!(row_text(&buf, 4).ends_with("[WARN] careful"));
        assert_eq!(
            buf.cell((0, 4)).map(|c| c.fg),
            Some(ThemeColors::default().warning)
        );
    }

    #[test]
    fn test_clearing_console_is_picked_up() {
        let console = ConsoleSink::new(10);
        let mut panel = OutputPanel::new(console.clone());
        console.record_text(ConsoleLevel::Log, "one");
        render(&mut panel, Rect::new(0, 0, 40, 5));
        assert_eq!(panel.lines.len(), 3);

        console.clear();
        let buf = render(&mut panel, Rect::new(0, 0, 40, 5));
        assert_eq!(panel.lines.len(), 2);
        assert_eq!(row_text(&buf, 1), "── console (0) ──");
    }

    #[test]
    fn test_auto_scroll_follows_new_entries() {
        let console = ConsoleSink::new(100);
        let mut panel = OutputPanel::new(console.clone());
        for i in 0..10 {
            console.record_text(ConsoleLevel::Log, format!("line {}", i));
        }
        let area = Rect::new(0, 0, 60, 4);
        let buf = render(&mut panel, area);
        assert!(row_text(&buf, 3).ends_with("line 9"));

        // scrolling up stops following
        press(&mut panel, KeyCode::Up);
        console.record_text(ConsoleLevel::Log, "line 10");
        let buf = render(&mut panel, area);
        assert!(row_text(&buf, 3).ends_with("line 8"));

        press(&mut panel, KeyCode::End);
        let buf = render(&mut panel, area);
        assert!(row_text(&buf, 3).ends_with("line 10"));
    }

    #[test]
    fn test_home_scrolls_to_top() {
        let console = ConsoleSink::new(100);
        let mut panel = OutputPanel::new(console.clone());
        for i in 0..10 {
            console.record_text(ConsoleLevel::Log, format!("line {}", i));
        }
        let area = Rect::new(0, 0, 60, 4);
        render(&mut panel, area);
        press(&mut panel, KeyCode::Home);
        let buf = render(&mut panel, area);
        assert_eq!(row_text(&buf, 0), "undefined");
    }
}
