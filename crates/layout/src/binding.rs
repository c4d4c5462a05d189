//! Handles a layout injects into its dividers.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ratatui::layout::Rect;

use crate::WidthDistribution;

/// Identity of a mounted layout, used to scope document listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(pub(crate) u64);

/// Reference to the layout's rendered container area.
///
/// Empty until the layout has been rendered once.
#[derive(Debug, Clone, Default)]
pub struct ContainerRef(Rc<Cell<Option<Rect>>>);

impl ContainerRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered container area.
    pub fn area(&self) -> Option<Rect> {
        self.0.get()
    }

    /// Rendered width in columns, if the container has been laid out.
    pub fn width(&self) -> Option<u16> {
        self.area().map(|a| a.width).filter(|&w| w > 0)
    }

    pub(crate) fn set(&self, area: Rect) {
        self.0.set(Some(area));
    }
}

/// Width-update callback handed to dividers.
///
/// Holds only a weak reference so updates against an unmounted layout are
/// dropped.
#[derive(Debug, Clone)]
pub struct WidthSetter {
    target: Weak<RefCell<WidthDistribution>>,
}

impl WidthSetter {
    pub(crate) fn new(target: &Rc<RefCell<WidthDistribution>>) -> Self {
        Self {
            target: Rc::downgrade(target),
        }
    }

    /// Replace the distribution with `f(previous)`.
    ///
    /// Returns `false` when the layout is gone or `f` declined the update.
    pub fn update(&self, f: impl FnOnce(&WidthDistribution) -> Option<WidthDistribution>) -> bool {
        let Some(target) = self.target.upgrade() else {
            return false;
        };
        let Ok(mut widths) = target.try_borrow_mut() else {
            return false;
        };
        match f(&widths) {
            Some(next) => {
                *widths = next;
                true
            }
            None => false,
        }
    }

    /// Read the current distribution, if the layout is still mounted.
    pub fn current(&self) -> Option<WidthDistribution> {
        let target = self.target.upgrade()?;
        let widths = target.try_borrow().ok()?;
        Some(widths.clone())
    }

    /// Check if the owning layout is still alive.
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

/// Everything a divider receives from its layout.
#[derive(Debug, Clone)]
pub struct DividerBinding {
    pub owner: LayoutId,
    pub container: ContainerRef,
    pub setter: WidthSetter,
    pub position: usize,
}
