//! Application orchestrator for sandbox.
//!
//! Wires the editor and output panels into a split layout, routes keyboard
//! and mouse input, and feeds editor changes to the evaluation worker.

mod app;
mod header;
mod state;
mod status_bar;

pub use app::App;
pub use header::{HeaderRegions, HeaderTarget};
pub use state::{AppState, Focus};
