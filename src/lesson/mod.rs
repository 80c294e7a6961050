//! Lesson state machines
//!
//! Each lesson walks a fixed list of steps, ends in a scored mini-game and
//! reports its star rating exactly once through [`Lesson::finish`]. Lessons
//! never talk to each other; the app drops the active lesson on every session
//! transition, which also drops its pending timers.

mod capacitor;
mod content;
mod diode;
mod inductor;
mod resistor;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::progress::StageKind;
use crate::scoring::Stars;

pub use capacitor::CapacitorLesson;
pub use content::{LessonInfo, lesson_info};
pub use diode::{Bias, DiodeLesson, MAX_ROTATIONS, Terminal};
pub use inductor::{CurrentDirection, InductorLesson, WireSide};
pub use resistor::{RESISTANCE_PRESETS, RESISTANCE_RANGE, ResistorLesson, electron_lap_seconds};

/// Knobs shared by every lesson, usually taken from the config file
#[derive(Debug, Clone)]
pub struct LessonSettings {
    /// How long a step prompt stays up before dismissing itself
    pub popup_duration: Duration,
    /// Show the intro panel before the first step
    pub show_intro: bool,
    /// Fixed seed for mini-game targets, random when unset
    pub seed: Option<u64>,
}

impl Default for LessonSettings {
    fn default() -> Self {
        Self {
            popup_duration: Duration::from_millis(3500),
            show_intro: true,
            seed: None,
        }
    }
}

impl LessonSettings {
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Mascot expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Idle,
    Speaking,
    Celebrating,
    Encouraging,
}

/// What Sparky the electron is currently saying
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mascot {
    pub message: String,
    pub mood: Mood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Action,
    Hint,
    Learn,
}

/// Instruction shown when a step begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub message: &'static str,
    pub kind: PromptKind,
}

/// Completion event handed to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCompletion {
    pub stage: StageKind,
    pub stars: Stars,
}

/// State every lesson shares: step index, intro and popup visibility, the
/// mascot, the mini-game outcome and the single-fire completion latch.
#[derive(Debug)]
pub struct LessonCore {
    kind: StageKind,
    prompts: &'static [Prompt],
    greeting: &'static str,
    popup_duration: Duration,
    step: usize,
    intro_visible: bool,
    popup_remaining: Option<Duration>,
    mascot: Mascot,
    outcome: Option<Stars>,
    summary_visible: bool,
    completion_sent: bool,
}

impl LessonCore {
    pub(crate) fn new(
        kind: StageKind,
        prompts: &'static [Prompt],
        greeting: &'static str,
        settings: &LessonSettings,
    ) -> Self {
        let mut core = Self {
            kind,
            prompts,
            greeting,
            popup_duration: settings.popup_duration,
            step: 0,
            intro_visible: settings.show_intro,
            popup_remaining: None,
            mascot: Mascot {
                message: greeting.to_string(),
                mood: Mood::Speaking,
            },
            outcome: None,
            summary_visible: false,
            completion_sent: false,
        };
        if !core.intro_visible {
            core.open_popup();
        }
        core
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.prompts.len()
    }

    pub fn prompt(&self) -> Option<&'static Prompt> {
        self.prompts.get(self.step)
    }

    pub fn mascot(&self) -> &Mascot {
        &self.mascot
    }

    pub fn outcome(&self) -> Option<Stars> {
        self.outcome
    }

    /// True while step interactions should respond: intro dismissed and the
    /// mini-game not yet resolved.
    pub(crate) fn accepts_input(&self) -> bool {
        !self.intro_visible && self.outcome.is_none()
    }

    pub(crate) fn say(&mut self, message: impl Into<String>, mood: Mood) {
        self.mascot = Mascot {
            message: message.into(),
            mood,
        };
    }

    pub(crate) fn go_to_step(&mut self, step: usize) {
        if step == self.step || step >= self.prompts.len() {
            return;
        }
        tracing::debug!("{} lesson: step {} -> {}", self.kind.name(), self.step, step);
        self.step = step;
        self.open_popup();
    }

    fn open_popup(&mut self) {
        self.popup_remaining = Some(self.popup_duration);
    }

    /// Lock in the mini-game result. Later calls are ignored.
    pub(crate) fn resolve(&mut self, stars: Stars) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        tracing::info!("{} mini-game resolved: {} star(s)", self.kind.name(), stars.get());
        self.outcome = Some(stars);
        true
    }

    pub(crate) fn show_summary(&mut self) {
        if self.outcome.is_some() {
            self.summary_visible = true;
            self.popup_remaining = None;
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        if let Some(remaining) = self.popup_remaining {
            self.popup_remaining = remaining.checked_sub(dt).filter(|r| !r.is_zero());
        }
    }

    /// Back to step 0 with the intro already read. The completion latch
    /// survives so a replayed lesson still reports at most once.
    pub(crate) fn reset(&mut self) {
        self.step = 0;
        self.intro_visible = false;
        self.outcome = None;
        self.summary_visible = false;
        self.mascot = Mascot {
            message: self.greeting.to_string(),
            mood: Mood::Speaking,
        };
        self.open_popup();
    }
}

/// The contract every lesson fulfils towards the app
pub trait Lesson {
    fn core(&self) -> &LessonCore;
    fn core_mut(&mut self) -> &mut LessonCore;

    /// Move the lesson clock forward, firing any due phases
    fn advance(&mut self, dt: Duration);

    /// Throw away all progress in this lesson and start from step 0
    fn replay(&mut self);

    fn kind(&self) -> StageKind {
        self.core().kind
    }

    fn step(&self) -> usize {
        self.core().step()
    }

    fn total_steps(&self) -> usize {
        self.core().total_steps()
    }

    fn mascot(&self) -> &Mascot {
        self.core().mascot()
    }

    fn intro_visible(&self) -> bool {
        self.core().intro_visible
    }

    fn dismiss_intro(&mut self) {
        let core = self.core_mut();
        if core.intro_visible {
            core.intro_visible = false;
            core.open_popup();
        }
    }

    /// Step prompt, while its popup is up
    fn popup(&self) -> Option<&'static Prompt> {
        let core = self.core();
        if core.intro_visible || core.summary_visible || core.popup_remaining.is_none() {
            return None;
        }
        core.prompt()
    }

    fn dismiss_popup(&mut self) {
        self.core_mut().popup_remaining = None;
    }

    fn summary_visible(&self) -> bool {
        self.core().summary_visible
    }

    /// Stars won in the mini-game, once it has been resolved
    fn stars(&self) -> Option<Stars> {
        self.core().outcome()
    }

    /// Hand over the result. Only returns `Some` once, after the summary is up.
    fn finish(&mut self) -> Option<StageCompletion> {
        let kind = self.kind();
        let core = self.core_mut();
        if core.completion_sent || !core.summary_visible {
            return None;
        }
        let stars = core.outcome?;
        core.completion_sent = true;
        Some(StageCompletion { stage: kind, stars })
    }
}

/// The lesson currently on screen
#[derive(Debug)]
pub enum ActiveLesson {
    Resistor(ResistorLesson),
    Inductor(InductorLesson),
    Capacitor(CapacitorLesson),
    Diode(DiodeLesson),
}

impl ActiveLesson {
    pub fn new(kind: StageKind, settings: &LessonSettings) -> Self {
        tracing::debug!("Mounting {} lesson", kind.name());
        match kind {
            StageKind::Resistor => ActiveLesson::Resistor(ResistorLesson::new(settings)),
            StageKind::Inductor => ActiveLesson::Inductor(InductorLesson::new(settings)),
            StageKind::Capacitor => ActiveLesson::Capacitor(CapacitorLesson::new(settings)),
            StageKind::Diode => ActiveLesson::Diode(DiodeLesson::new(settings)),
        }
    }

    pub fn as_lesson(&self) -> &dyn Lesson {
        match self {
            ActiveLesson::Resistor(l) => l,
            ActiveLesson::Inductor(l) => l,
            ActiveLesson::Capacitor(l) => l,
            ActiveLesson::Diode(l) => l,
        }
    }

    pub fn as_lesson_mut(&mut self) -> &mut dyn Lesson {
        match self {
            ActiveLesson::Resistor(l) => l,
            ActiveLesson::Inductor(l) => l,
            ActiveLesson::Capacitor(l) => l,
            ActiveLesson::Diode(l) => l,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn settings() -> LessonSettings {
        LessonSettings {
            popup_duration: Duration::from_millis(3500),
            show_intro: false,
            seed: Some(7),
        }
    }

    pub fn run(lesson: &mut dyn Lesson, millis: u64) {
        lesson.advance(Duration::from_millis(millis));
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_intro_blocks_until_dismissed() {
        let settings = LessonSettings {
            show_intro: true,
            ..settings()
        };
        let mut lesson = ActiveLesson::new(StageKind::Capacitor, &settings);
        let lesson = lesson.as_lesson_mut();
        assert!(lesson.intro_visible());
        assert!(lesson.popup().is_none());
        lesson.dismiss_intro();
        assert!(!lesson.intro_visible());
        assert!(lesson.popup().is_some());
    }

    #[test]
    fn test_popup_auto_dismisses() {
        let mut lesson = ActiveLesson::new(StageKind::Inductor, &settings());
        let lesson = lesson.as_lesson_mut();
        assert!(lesson.popup().is_some());
        run(lesson, 3499);
        assert!(lesson.popup().is_some());
        run(lesson, 1);
        assert!(lesson.popup().is_none());
    }

    #[test]
    fn test_active_lesson_kinds() {
        for kind in StageKind::ALL {
            let lesson = ActiveLesson::new(kind, &settings());
            assert_eq!(lesson.as_lesson().kind(), kind);
            assert_eq!(lesson.as_lesson().step(), 0);
            assert!(lesson.as_lesson().stars().is_none());
        }
    }

    #[test]
    fn test_finish_before_summary_is_none() {
        let mut lesson = ActiveLesson::new(StageKind::Diode, &settings());
        assert!(lesson.as_lesson_mut().finish().is_none());
    }
}
