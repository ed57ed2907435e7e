//! GridSketch Application
//!
//! Windowing, input translation and the egui panel around the editor core.

#[cfg(feature = "native")]
mod app;
mod event_handler;
mod shortcuts;
mod ui;

#[cfg(feature = "native")]
pub use app::{App, AppConfig};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};
