//! UI modules for Electronics Universe
//!
//! One module per screen plus the shared widgets and theme. Widgets never
//! touch the session directly: they queue a [`UiAction`] on the app, which
//! applies it once the frame is drawn.

mod celebration;
mod components;
mod stage;
pub mod theme;
mod welcome;

pub use celebration::render_celebration;
pub use components::{render_about_dialog, render_progress_constellation, render_top_bar};
pub use stage::render_stage;
pub use welcome::render_welcome;

use theme::ThemePreset;

/// Something a widget asked the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Leave the welcome screen
    Start,
    /// Hand the active lesson's result to the session
    FinishStage,
    ReplayStage,
    PlayAgain,
    GoHome,
    SetTheme(ThemePreset),
    ShowAbout,
}
