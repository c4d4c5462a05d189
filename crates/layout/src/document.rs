//! Application-wide pointer dispatch.
//!
//! Drag listeners are registered here rather than on a divider, so a drag
//! keeps tracking after the pointer leaves the handle and ends on a
//! pointer-up anywhere.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use sandbox_logger as logger;

use crate::{LayoutId, WidthSetter};

/// Pointer event in container coordinates (terminal columns and rows).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

impl PointerEvent {
    /// Translate a terminal mouse event. Only the left button drags.
    pub fn from_mouse(event: &MouseEvent) -> Option<Self> {
        let x = f64::from(event.column);
        let y = f64::from(event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Down { x, y }),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(Self::Move { x, y })
            }
            MouseEventKind::Up(MouseButton::Left) => Some(Self::Up { x, y }),
            _ => None,
        }
    }

    pub fn x(&self) -> f64 {
        match *self {
            Self::Down { x, .. } | Self::Move { x, .. } | Self::Up { x, .. } => x,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            Self::Down { y, .. } | Self::Move { y, .. } | Self::Up { y, .. } => y,
        }
    }
}

/// State captured when a divider is pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Position of the divider among all layout children
    pub divider: usize,
    /// Pointer X at pointer-down
    pub start_x: f64,
    /// Container width in columns at pointer-down
    pub container_width: f64,
}

impl DragSession {
    /// Slot of the panel left of the divider.
    pub fn left_slot(&self) -> usize {
        self.divider.saturating_sub(1)
    }

    /// Slot of the panel right of the divider.
    pub fn right_slot(&self) -> usize {
        self.divider + 1
    }

    /// Pointer travel since pointer-down, in percent of the container.
    pub fn delta_percent(&self, x: f64) -> f64 {
        (x - self.start_x) / self.container_width * 100.0
    }
}

/// Handle returned when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct DragListener {
    id: ListenerId,
    owner: LayoutId,
    session: DragSession,
    setter: WidthSetter,
}

/// Registry of document-scoped drag listeners.
#[derive(Default)]
pub struct PointerDocument {
    listeners: Vec<DragListener>,
    next_id: u64,
}

/// Document shared between the application and every mounted layout.
pub type SharedDocument = Rc<RefCell<PointerDocument>>;

impl PointerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// New document wrapped for sharing.
    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register move/up handling for one drag session.
    pub fn add_drag_listener(
        &mut self,
        owner: LayoutId,
        session: DragSession,
        setter: WidthSetter,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(DragListener {
            id,
            owner,
            session,
            setter,
        });
        id
    }

    /// Deregister a single listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Deregister every listener a layout left behind. Returns the count.
    pub fn remove_owner(&mut self, owner: LayoutId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != owner);
        before - self.listeners.len()
    }

    /// Active session of a layout's divider, if it is being dragged.
    pub fn session(&self, owner: LayoutId, divider: usize) -> Option<&DragSession> {
        self.listeners
            .iter()
            .find(|l| l.owner == owner && l.session.divider == divider)
            .map(|l| &l.session)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Check if any drag is in progress.
    pub fn is_dragging(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Deliver a pointer event to every listener.
    ///
    /// Returns `true` when widths changed or a drag ended.
    pub fn dispatch(&mut self, event: &PointerEvent) -> bool {
        match *event {
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { x, .. } => {
                let mut changed = false;
                for listener in &self.listeners {
                    changed |= Self::apply_move(listener, x);
                }
                self.listeners.retain(|l| l.setter.is_alive());
                changed
            }
            PointerEvent::Up { .. } => {
                let ended = self.listeners.len();
                if ended > 0 {
                    logger::debug(format!("Drag ended ({} listener(s) removed)", ended));
                }
                self.listeners.clear();
                ended > 0
            }
        }
    }

    fn apply_move(listener: &DragListener, x: f64) -> bool {
        let session = &listener.session;
        let delta = session.delta_percent(x);
        let updated = listener
            .setter
            .update(|prev| prev.resized_pair(session.divider, delta));

        if updated {
            if let Some(widths) = listener.setter.current() {
                logger::debug(format!(
                    "Divider {} moved by {:.2}%: {:?}",
                    session.divider,
                    delta,
                    widths.iter().collect::<Vec<_>>()
                ));
            }
        }
        updated
    }
}
