//! Children a split layout composes: panels, dividers and ignored nodes.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Widget},
};
use sandbox_core::{Panel as PanelContent, RenderContext, ThemeColors};

use crate::{DividerBinding, DragSession, ListenerId, PointerDocument};

/// Layout slot holding panel content, sized by the layout.
pub struct Panel {
    content: Box<dyn PanelContent>,
    title: Option<String>,
    style: Style,
    area: Option<Rect>,
}

impl Panel {
    pub fn new(content: Box<dyn PanelContent>) -> Self {
        Self {
            content,
            title: None,
            style: Style::default(),
            area: None,
        }
    }

    /// Fixed border title instead of the content's own title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Base style of the panel container.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn content(&self) -> &dyn PanelContent {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn PanelContent {
        self.content.as_mut()
    }

    /// Outer area assigned at the last layout pass.
    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Area inside the border, where content is drawn.
    pub fn content_area(&self) -> Option<Rect> {
        self.area.map(|area| Block::default().borders(Borders::ALL).inner(area))
    }

    pub(crate) fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub(crate) fn render(&mut self, buf: &mut Buffer, colors: &ThemeColors, is_focused: bool) {
        let Some(area) = self.area else {
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        let border_color = if is_focused {
            colors.border_focused
        } else {
            colors.border
        };
        let title = self.title.clone().unwrap_or_else(|| self.content.title());
        let title_style = if is_focused {
            Style::default()
                .fg(colors.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(self.style.bg(colors.bg))
            .title(Span::styled(format!(" {} ", title), title_style));
        let inner = block.inner(area);
        block.render(area, buf);

        let ctx = RenderContext {
            theme: colors,
            is_focused,
        };
        self.content.render(inner, buf, &ctx);
    }
}

/// Drag handle between two panels.
pub struct Divider {
    symbol: String,
    style: Style,
    thickness: u16,
    binding: Option<DividerBinding>,
    area: Option<Rect>,
}

impl Divider {
    pub fn new() -> Self {
        Self {
            symbol: "│".to_string(),
            style: Style::default(),
            thickness: 1,
            binding: None,
            area: None,
        }
    }

    /// Glyph repeated down the handle.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Handle width in columns (at least 1).
    pub fn thickness(mut self, thickness: u16) -> Self {
        self.thickness = thickness.max(1);
        self
    }

    pub fn width(&self) -> u16 {
        self.thickness
    }

    /// Binding injected by the layout; `None` for a divider never mounted.
    pub fn binding(&self) -> Option<&DividerBinding> {
        self.binding.as_ref()
    }

    /// Position among all layout children.
    pub fn position(&self) -> Option<usize> {
        self.binding.as_ref().map(|b| b.position)
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Hit test against the last rendered handle area.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let Some(area) = self.area else {
            return false;
        };
        x >= f64::from(area.left())
            && x < f64::from(area.right())
            && y >= f64::from(area.top())
            && y < f64::from(area.bottom())
    }

    /// Start a drag at pointer X `x`.
    ///
    /// Silently does nothing without a binding, before the container has a
    /// width, or when the divider is not flanked by two panels.
    pub fn pointer_down(&self, x: f64, document: &mut PointerDocument) -> Option<ListenerId> {
        let binding = self.binding.as_ref()?;
        let container_width = binding.container.width()?;
        let widths = binding.setter.current()?;
        let left_slot = binding.position.checked_sub(1)?;
        if !widths.contains(left_slot) || !widths.contains(binding.position + 1) {
            return None;
        }

        let session = DragSession {
            divider: binding.position,
            start_x: x,
            container_width: f64::from(container_width),
        };
        Some(document.add_drag_listener(binding.owner, session, binding.setter.clone()))
    }

    pub(crate) fn bind(&mut self, binding: DividerBinding) {
        self.binding = Some(binding);
    }

    pub(crate) fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub(crate) fn render(&self, buf: &mut Buffer, colors: &ThemeColors, is_dragging: bool) {
        let Some(area) = self.area else {
            return;
        };
        let color = if is_dragging {
            colors.border_focused
        } else {
            colors.border
        };
        let style = self.style.fg(color).bg(colors.bg);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_symbol(&self.symbol).set_style(style);
            }
        }
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::new()
    }
}

/// One declared child of a split layout.
pub enum SplitChild {
    Panel(Panel),
    Divider(Divider),
    /// Anything else; laid out as nothing.
    Text(String),
}

impl SplitChild {
    pub fn is_panel(&self) -> bool {
        matches!(self, SplitChild::Panel(_))
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, SplitChild::Divider(_))
    }
}

impl From<Panel> for SplitChild {
    fn from(panel: Panel) -> Self {
        SplitChild::Panel(panel)
    }
}

impl From<Divider> for SplitChild {
    fn from(divider: Divider) -> Self {
        SplitChild::Divider(divider)
    }
}

impl From<&str> for SplitChild {
    fn from(text: &str) -> Self {
        SplitChild::Text(text.to_string())
    }
}
