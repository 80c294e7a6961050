//! Application state modules
//!
//! Grouped state structs owned by the app: UI-only state and the timed
//! reveals of the welcome and celebration screens.

mod reveal;
mod ui;

pub use reveal::{RevealPart, RevealSequence};
pub use ui::UiState;
