//! Horizontal split layout with draggable dividers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use sandbox_core::ThemeColors;
use sandbox_logger as logger;

use crate::{
    ContainerRef, Divider, DividerBinding, LayoutId, Panel, SharedDocument, SplitChild,
    WidthDistribution, WidthSetter,
};

static NEXT_LAYOUT_ID: AtomicU64 = AtomicU64::new(1);

/// Kind of a laid out child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Panel,
    Divider,
}

/// Columns assigned to one child by a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSpan {
    /// Position among all children
    pub slot: usize,
    pub kind: SpanKind,
    pub x: u16,
    pub width: u16,
}

/// Row of panels separated by draggable dividers.
///
/// Panel widths are percentages keyed by each panel's position among all
/// children. The equal split is computed once at mount; afterwards only
/// divider drags change it.
pub struct SplitLayout {
    id: LayoutId,
    children: Vec<SplitChild>,
    widths: Rc<RefCell<WidthDistribution>>,
    container: ContainerRef,
    document: SharedDocument,
    style: Style,
    mounted: bool,
}

impl SplitLayout {
    /// Mount a layout over `children`, registering drags with `document`.
    pub fn mount(children: Vec<SplitChild>, document: SharedDocument) -> Self {
        let id = LayoutId(NEXT_LAYOUT_ID.fetch_add(1, Ordering::Relaxed));

        let panel_slots: Vec<usize> = children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.is_panel())
            .map(|(slot, _)| slot)
            .collect();
        let widths = Rc::new(RefCell::new(WidthDistribution::equal_split(&panel_slots)));
        let container = ContainerRef::new();

        let mut children = children;
        for (position, child) in children.iter_mut().enumerate() {
            if let SplitChild::Divider(divider) = child {
                divider.bind(DividerBinding {
                    owner: id,
                    container: container.clone(),
                    setter: WidthSetter::new(&widths),
                    position,
                });
            }
        }

        logger::debug(format!(
            "Split layout {} mounted with {} panel(s)",
            id.0,
            panel_slots.len()
        ));

        Self {
            id,
            children,
            widths,
            container,
            document,
            style: Style::default(),
            mounted: true,
        }
    }

    /// Container-level style override.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }

    pub fn children(&self) -> &[SplitChild] {
        &self.children
    }

    /// Snapshot of the current width distribution.
    pub fn widths(&self) -> WidthDistribution {
        self.widths.borrow().clone()
    }

    /// Current width of the panel at `slot`.
    pub fn width_of(&self, slot: usize) -> Option<f64> {
        self.widths.borrow().get(slot)
    }

    /// Reference to the rendered container.
    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    /// Positions of panel children.
    pub fn panel_slots(&self) -> Vec<usize> {
        self.slots_where(SplitChild::is_panel)
    }

    /// Positions of divider children.
    pub fn divider_positions(&self) -> Vec<usize> {
        self.slots_where(SplitChild::is_divider)
    }

    fn slots_where(&self, pred: impl Fn(&SplitChild) -> bool) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| pred(child))
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn panel(&self, slot: usize) -> Option<&Panel> {
        match self.children.get(slot) {
            Some(SplitChild::Panel(panel)) => Some(panel),
            _ => None,
        }
    }

    pub fn panel_mut(&mut self, slot: usize) -> Option<&mut Panel> {
        match self.children.get_mut(slot) {
            Some(SplitChild::Panel(panel)) => Some(panel),
            _ => None,
        }
    }

    pub fn divider(&self, position: usize) -> Option<&Divider> {
        match self.children.get(position) {
            Some(SplitChild::Divider(divider)) => Some(divider),
            _ => None,
        }
    }

    /// Iterate `(slot, panel)` mutably.
    pub fn panels_mut(&mut self) -> impl Iterator<Item = (usize, &mut Panel)> {
        self.children
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, child)| match child {
                SplitChild::Panel(panel) => Some((slot, panel)),
                _ => None,
            })
    }

    /// Column spans for `area` under the current widths.
    ///
    /// Dividers take their thickness; panels share the remaining columns by
    /// percentage with cumulative rounding. Spans past the right edge are
    /// clipped.
    pub fn column_spans(&self, area: Rect) -> Vec<ChildSpan> {
        let widths = self.widths.borrow();
        let divider_cols: u16 = self
            .children
            .iter()
            .filter_map(|child| match child {
                SplitChild::Divider(d) => Some(d.width()),
                _ => None,
            })
            .fold(0u16, |acc, w| acc.saturating_add(w));
        let avail = f64::from(area.width.saturating_sub(divider_cols));
        let right = area.right();

        let mut spans = Vec::new();
        let mut x = area.x;
        let mut cumulative = 0.0;

        for (slot, child) in self.children.iter().enumerate() {
            let (kind, wanted) = match child {
                SplitChild::Panel(_) => {
                    let start = (cumulative / 100.0 * avail).round();
                    cumulative += widths.get(slot).unwrap_or(0.0);
                    let end = (cumulative / 100.0 * avail).round();
                    (SpanKind::Panel, (end - start).max(0.0) as u16)
                }
                SplitChild::Divider(divider) => (SpanKind::Divider, divider.width()),
                SplitChild::Text(_) => continue,
            };
            let width = wanted.min(right.saturating_sub(x));
            spans.push(ChildSpan {
                slot,
                kind,
                x,
                width,
            });
            x = x.saturating_add(width);
        }
        spans
    }

    /// Layout pass: record the container and assign child areas.
    pub fn arrange(&mut self, area: Rect) {
        self.container.set(area);
        let spans = self.column_spans(area);
        for span in spans {
            let child_area = Rect::new(span.x, area.y, span.width, area.height);
            match self.children.get_mut(span.slot) {
                Some(SplitChild::Panel(panel)) => panel.set_area(child_area),
                Some(SplitChild::Divider(divider)) => divider.set_area(child_area),
                _ => {}
            }
        }
    }

    /// Lay out and draw all children. `focused` is the slot of the focused panel.
    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        colors: &ThemeColors,
        focused: Option<usize>,
    ) {
        self.arrange(area);
        buf.set_style(area, self.style);

        let dragging: Vec<usize> = {
            let document = self.document.borrow();
            self.divider_positions()
                .into_iter()
                .filter(|&pos| document.session(self.id, pos).is_some())
                .collect()
        };

        for (slot, child) in self.children.iter_mut().enumerate() {
            match child {
                SplitChild::Panel(panel) => panel.render(buf, colors, focused == Some(slot)),
                SplitChild::Divider(divider) => {
                    divider.render(buf, colors, dragging.contains(&slot))
                }
                SplitChild::Text(_) => {}
            }
        }
    }

    /// Divider under the pointer, if any.
    pub fn divider_at(&self, x: f64, y: f64) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .find_map(|(slot, child)| match child {
                SplitChild::Divider(d) if d.contains(x, y) => Some(slot),
                _ => None,
            })
    }

    /// Panel under the pointer, if any.
    pub fn panel_at(&self, x: f64, y: f64) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .find_map(|(slot, child)| match child {
                SplitChild::Panel(p) => p
                    .area()
                    .filter(|a| {
                        x >= f64::from(a.left())
                            && x < f64::from(a.right())
                            && y >= f64::from(a.top())
                            && y < f64::from(a.bottom())
                    })
                    .map(|_| slot),
                _ => None,
            })
    }

    /// Start dragging the divider at `position` from pointer X `x`.
    pub fn begin_drag(&self, position: usize, x: f64) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(divider) = self.divider(position) else {
            return false;
        };
        let Ok(mut document) = self.document.try_borrow_mut() else {
            return false;
        };
        divider.pointer_down(x, &mut document).is_some()
    }

    /// Pointer-down routing: starts a drag when a divider was hit.
    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        match self.divider_at(x, y) {
            Some(position) => self.begin_drag(position, x),
            None => false,
        }
    }

    /// Check if one of this layout's dividers is being dragged.
    pub fn is_dragging(&self) -> bool {
        let document = self.document.borrow();
        self.divider_positions()
            .into_iter()
            .any(|pos| document.session(self.id, pos).is_some())
    }

    /// Deregister every listener left by an in-flight drag.
    ///
    /// Called on drop as well. Returns the number of listeners removed.
    pub fn unmount(&mut self) -> usize {
        if !self.mounted {
            return 0;
        }
        self.mounted = false;
        match self.document.try_borrow_mut() {
            Ok(mut document) => document.remove_owner(self.id),
            Err(_) => 0,
        }
    }
}

impl Drop for SplitLayout {
    fn drop(&mut self) {
        self.unmount();
    }
}
