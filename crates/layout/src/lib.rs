//! Resizable split panel layout for sandbox.
//!
//! This crate provides a horizontal row of panels separated by drag handles:
//! - `SplitLayout` - owns the width distribution and lays out its children
//! - `Panel` / `Divider` - the children a layout composes
//! - `PointerDocument` - application-wide registry of drag listeners
//! - `WidthDistribution` - percentage widths keyed by child position

mod binding;
mod children;
mod document;
mod split_layout;
mod widths;

pub use binding::{ContainerRef, DividerBinding, LayoutId, WidthSetter};
pub use children::{Divider, Panel, SplitChild};
pub use document::{DragSession, ListenerId, PointerDocument, PointerEvent, SharedDocument};
pub use split_layout::{ChildSpan, SpanKind, SplitLayout};
pub use widths::{clamp_share, WidthDistribution, MAX_PANEL_PERCENT, MIN_PANEL_PERCENT};
