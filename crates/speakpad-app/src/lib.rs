//! SpeakPad Application
//!
//! The native shell: windowing, marker rendering, the egui control panel,
//! and wiring of window events to the interaction controller.

mod app;
mod marker;
mod ui;

pub use app::{App, AppConfig, ScreenController};
pub use marker::{paint_marker, MARKER_RADIUS};
pub use ui::{render_ui, ScreenView, UiAction, UiState};
