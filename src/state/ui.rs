//! UI-related application state

use egui_commonmark::CommonMarkCache;

use super::reveal::{CELEBRATION, RevealSequence, WELCOME};
use crate::session::SessionState;
use crate::ui::theme::{Theme, ThemePreset};

/// UI-related state
pub struct UiState {
    /// Cache for markdown rendering
    pub markdown_cache: CommonMarkCache,
    /// Current theme
    pub current_theme: Theme,
    pub theme_preset: ThemePreset,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
    pub reduce_motion: bool,
    /// Reveal timers for the welcome or celebration screen
    pub reveal: Option<RevealSequence>,
}

impl UiState {
    /// Create a new UiState with the given theme
    pub fn new(preset: ThemePreset, reduce_motion: bool) -> Self {
        Self {
            markdown_cache: CommonMarkCache::default(),
            current_theme: preset.theme(),
            theme_preset: preset,
            theme_dirty: true, // Apply theme on first frame
            show_about_dialog: false,
            reduce_motion,
            reveal: None,
        }
    }

    pub fn set_theme(&mut self, preset: ThemePreset) {
        if preset != self.theme_preset {
            self.theme_preset = preset;
            self.current_theme = preset.theme();
            self.theme_dirty = true;
        }
    }

    /// Start the reveal that belongs to `state`, replacing any running one
    pub fn reset_reveal(&mut self, state: SessionState) {
        self.reveal = match state {
            SessionState::Welcome => Some(RevealSequence::new(&WELCOME, self.reduce_motion)),
            SessionState::Complete => {
                Some(RevealSequence::new(&CELEBRATION, self.reduce_motion))
            }
            SessionState::Stage(_) => None,
        };
    }
}
