use eframe::egui;
use std::time::Duration;

use crate::config::Config;
use crate::lesson::{ActiveLesson, Lesson, LessonSettings};
use crate::session::{Orchestrator, SessionState};
use crate::state::UiState;
use crate::ui::theme::ThemePreset;
use crate::ui::{self, UiAction};

/// Longest frame step fed to the lesson clocks, so a stalled window does not
/// skip whole steps when it wakes up
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Main application state
pub struct EduApp {
    /// Application configuration
    pub(crate) config: Config,
    pub(crate) settings: LessonSettings,
    pub(crate) session: Orchestrator,
    /// Lesson for the active stage, rebuilt on every stage change
    pub(crate) lesson: Option<ActiveLesson>,
    pub(crate) ui: UiState,
    /// Actions raised by widgets during this frame
    pub(crate) actions: Vec<UiAction>,
}

impl EduApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let settings = config.lesson_settings();
        let mut ui = UiState::new(config.appearance.theme, config.appearance.reduce_motion);
        let session = Orchestrator::new();
        ui.reset_reveal(session.state());

        Self {
            config,
            settings,
            session,
            lesson: None,
            ui,
            actions: Vec::new(),
        }
    }

    /// Queue an action to run after this frame's widgets are drawn
    pub(crate) fn queue(&mut self, action: UiAction) {
        self.actions.push(action);
    }

    /// Move every clock forward by one frame
    pub(crate) fn advance(&mut self, dt: Duration) {
        let dt = dt.min(MAX_FRAME_STEP);
        if let Some(lesson) = self.lesson.as_mut() {
            lesson.as_lesson_mut().advance(dt);
        }
        if let Some(reveal) = self.ui.reveal.as_mut() {
            reveal.advance(dt);
        }
    }

    pub(crate) fn apply_actions(&mut self) {
        for action in std::mem::take(&mut self.actions) {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: UiAction) {
        let before = self.session.state();
        let result = match action {
            UiAction::Start => self.session.start(),
            UiAction::FinishStage => {
                let Some(done) = self.lesson.as_mut().and_then(|l| l.as_lesson_mut().finish())
                else {
                    return;
                };
                self.session.complete_stage(done.stage.index(), done.stars)
            }
            UiAction::ReplayStage => {
                if let Some(lesson) = self.lesson.as_mut() {
                    tracing::debug!("Replaying {} lesson", lesson.as_lesson().kind().name());
                    lesson.as_lesson_mut().replay();
                }
                return;
            }
            UiAction::PlayAgain => self.session.play_again(),
            UiAction::GoHome => self.session.go_home(),
            UiAction::SetTheme(preset) => {
                self.set_theme(preset);
                return;
            }
            UiAction::ShowAbout => {
                self.ui.show_about_dialog = true;
                return;
            }
        };

        match result {
            Ok(state) if state != before => self.enter(state),
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring {:?}: {}", action, e),
        }
    }

    /// Swap the lesson and the screen reveal for the new state
    fn enter(&mut self, state: SessionState) {
        self.lesson = state
            .stage()
            .map(|kind| ActiveLesson::new(kind, &self.settings));
        self.ui.reset_reveal(state);
    }

    fn set_theme(&mut self, preset: ThemePreset) {
        if preset == self.config.appearance.theme {
            return;
        }
        self.ui.set_theme(preset);
        self.config.appearance.theme = preset;
        self.save_config();
    }

    /// Save configuration to disk
    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }
}

impl eframe::App for EduApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        let dt = ctx.input(|i| i.stable_dt);
        self.advance(Duration::from_secs_f32(dt.max(0.0)));

        ui::render_top_bar(self, ctx);
        if self.session.view().show_progress {
            ui::render_progress_constellation(self, ctx);
        }

        egui::CentralPanel::default().show(ctx, |panel| match self.session.state() {
            SessionState::Welcome => ui::render_welcome(self, panel),
            SessionState::Stage(_) => ui::render_stage(self, panel),
            SessionState::Complete => ui::render_celebration(self, panel),
        });

        ui::render_about_dialog(self, ctx);

        self.apply_actions();

        // Timers and animations need a steady frame clock
        ctx.request_repaint();
    }
}
