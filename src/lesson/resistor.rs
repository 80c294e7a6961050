//! Resistor lesson: place the parts, watch the current, then match an LED
//! brightness by turning the resistance knob.

use std::ops::{Range, RangeInclusive};
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use super::{Lesson, LessonCore, LessonSettings, Mood, Prompt, PromptKind};
use crate::progress::StageKind;
use crate::scoring::stars_for_brightness_match;
use crate::timeline::{TimerId, Timeline};

const BATTERY_VOLTS: f32 = 9.0;
/// Current at which the LED is fully lit
const FULL_BRIGHTNESS_AMPS: f32 = 0.18;
const MIN_BRIGHTNESS: f32 = 10.0;
const MATCH_TOLERANCE: f32 = 8.0;

pub const RESISTANCE_RANGE: RangeInclusive<u32> = 10..=100;
pub const RESISTANCE_PRESETS: [(&str, u32); 3] = [("Low", 20), ("Med", 50), ("High", 80)];
const DEFAULT_RESISTANCE: u32 = 50;
/// Targets stay inside what the knob can reach (50-100%)
const TARGET_RANGE: Range<u32> = 55..95;

const PLACED_DELAY: Duration = Duration::from_millis(1000);
const POWER_DELAY: Duration = Duration::from_millis(1500);
const READOUT_DELAY: Duration = Duration::from_millis(400);
const GAME_ARM_DELAY: Duration = Duration::from_millis(3000);
const GAME_BUDGET: Duration = Duration::from_secs(20);
const SUMMARY_DELAY: Duration = Duration::from_millis(1500);

static PROMPTS: [Prompt; 5] = [
    Prompt {
        message: "Step 1: Drag the resistor into the gap.",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Step 2: Add the battery and tap Power On!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Watch electrons slow down in the resistor!",
        kind: PromptKind::Hint,
    },
    Prompt {
        message: "Try changing resistance and see the current change!",
        kind: PromptKind::Hint,
    },
    Prompt {
        message: "Mini-challenge: Match the LED brightness!",
        kind: PromptKind::Action,
    },
];

/// Ohm's law with the lesson's fixed 9 V battery
pub fn current_amps(resistance: u32) -> f32 {
    BATTERY_VOLTS / resistance.max(1) as f32
}

/// LED brightness in percent for a given resistance
pub fn brightness_percent(resistance: u32) -> f32 {
    (current_amps(resistance) / FULL_BRIGHTNESS_AMPS * 100.0).clamp(MIN_BRIGHTNESS, 100.0)
}

/// Seconds an electron takes to lap the circuit
pub fn electron_lap_seconds(resistance: u32) -> f32 {
    (5.0 - resistance as f32 / 25.0).max(1.5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Step(usize),
    ShowReadout,
    ArmGame,
    GameTimeout,
    ShowSummary,
}

#[derive(Debug)]
pub struct ResistorLesson {
    core: LessonCore,
    timeline: Timeline<Phase>,
    rng: StdRng,
    resistor_placed: bool,
    battery_placed: bool,
    powered: bool,
    resistance: u32,
    readout_visible: bool,
    challenge_started: bool,
    game_active: bool,
    matched: bool,
    target_brightness: u32,
    budget_timer: Option<TimerId>,
    armed_at: Option<Duration>,
}

impl ResistorLesson {
    pub fn new(settings: &LessonSettings) -> Self {
        Self {
            core: LessonCore::new(
                StageKind::Resistor,
                &PROMPTS,
                "Let's learn about resistors!",
                settings,
            ),
            timeline: Timeline::new(),
            rng: settings.rng(),
            resistor_placed: false,
            battery_placed: false,
            powered: false,
            resistance: DEFAULT_RESISTANCE,
            readout_visible: false,
            challenge_started: false,
            game_active: false,
            matched: false,
            target_brightness: 60,
            budget_timer: None,
            armed_at: None,
        }
    }

    pub fn resistor_placed(&self) -> bool {
        self.resistor_placed
    }

    pub fn battery_placed(&self) -> bool {
        self.battery_placed
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn resistance(&self) -> u32 {
        self.resistance
    }

    pub fn current_amps(&self) -> f32 {
        current_amps(self.resistance)
    }

    pub fn brightness(&self) -> f32 {
        brightness_percent(self.resistance)
    }

    pub fn readout_visible(&self) -> bool {
        self.readout_visible
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn target_brightness(&self) -> u32 {
        self.target_brightness
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn within_tolerance(&self) -> bool {
        (self.brightness() - self.target_brightness as f32).abs() < MATCH_TOLERANCE
    }

    /// Seconds left in the matching game
    pub fn time_left(&self) -> Option<Duration> {
        if !self.game_active {
            return None;
        }
        let armed_at = self.armed_at?;
        Some((armed_at + GAME_BUDGET).saturating_sub(self.timeline.now()))
    }

    pub fn place_resistor(&mut self) {
        if !self.core.accepts_input() || self.step() != 0 || self.resistor_placed {
            return;
        }
        self.resistor_placed = true;
        self.core.say("Perfect! Resistor in place!", Mood::Celebrating);
        self.timeline.after(PLACED_DELAY, Phase::Step(1));
    }

    pub fn place_battery(&mut self) {
        if !self.core.accepts_input() || self.step() != 1 || self.battery_placed {
            return;
        }
        self.battery_placed = true;
        self.core.say("Tap Power On!", Mood::Encouraging);
    }

    pub fn power_on(&mut self) {
        if !self.core.accepts_input() || self.step() != 1 || !self.battery_placed || self.powered {
            return;
        }
        self.powered = true;
        self.core.say("Electrons flowing!", Mood::Celebrating);
        self.timeline.after(POWER_DELAY, Phase::Step(2));
    }

    /// Move the resistance knob. Only responds once the readout panel is up.
    pub fn set_resistance(&mut self, resistance: u32) {
        if !self.core.accepts_input() || !self.readout_visible {
            return;
        }
        self.resistance = resistance.clamp(*RESISTANCE_RANGE.start(), *RESISTANCE_RANGE.end());

        if self.game_active {
            if self.within_tolerance() {
                self.finish_game(true);
            }
            return;
        }

        let message = if self.resistance > 70 {
            "High resistance means slow electrons!"
        } else if self.resistance < 30 {
            "Low resistance means fast electrons!"
        } else {
            "Try different values!"
        };
        self.core.say(message, Mood::Speaking);
    }

    /// Leave the observation step for free exploration
    pub fn continue_exploring(&mut self) {
        if self.core.accepts_input() && self.step() == 2 {
            self.core.go_to_step(3);
        }
    }

    pub fn start_challenge(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 || self.challenge_started {
            return;
        }
        self.challenge_started = true;
        self.core.go_to_step(4);
        self.target_brightness = self.rng.gen_range(TARGET_RANGE);
        tracing::debug!("Resistor brightness target: {}%", self.target_brightness);
        self.timeline.after(GAME_ARM_DELAY, Phase::ArmGame);
    }

    fn finish_game(&mut self, matched: bool) {
        self.game_active = false;
        self.matched = matched;
        if let Some(timer) = self.budget_timer.take() {
            self.timeline.cancel(timer);
        }
        if matched {
            self.core.say(
                "You did it! More resistance = less current = dimmer light!",
                Mood::Celebrating,
            );
        } else {
            self.core.say(
                "Time's up! Remember: more resistance means a dimmer light.",
                Mood::Encouraging,
            );
        }
        self.core.resolve(stars_for_brightness_match(matched));
        self.timeline.after(SUMMARY_DELAY, Phase::ShowSummary);
    }

    fn handle(&mut self, phase: Phase) {
        match phase {
            Phase::Step(1) => {
                self.core.go_to_step(1);
                self.core.say("Now add the battery!", Mood::Speaking);
            }
            Phase::Step(2) => {
                self.core.go_to_step(2);
                self.core.say("See how the resistor slows them down?", Mood::Speaking);
                if self.powered {
                    self.timeline.after(READOUT_DELAY, Phase::ShowReadout);
                }
            }
            Phase::Step(step) => self.core.go_to_step(step),
            Phase::ShowReadout => self.readout_visible = true,
            Phase::ArmGame => {
                self.game_active = true;
                self.armed_at = Some(self.timeline.now());
                self.budget_timer = Some(self.timeline.after(GAME_BUDGET, Phase::GameTimeout));
                self.core.say("Match the target brightness!", Mood::Encouraging);
            }
            Phase::GameTimeout => {
                self.budget_timer = None;
                if self.game_active {
                    self.finish_game(false);
                }
            }
            Phase::ShowSummary => self.core.show_summary(),
        }
    }
}

impl Lesson for ResistorLesson {
    fn core(&self) -> &LessonCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LessonCore {
        &mut self.core
    }

    fn advance(&mut self, dt: Duration) {
        self.core.tick(dt);
        let until = self.timeline.now() + dt;
        while let Some(phase) = self.timeline.pop_due(until) {
            self.handle(phase);
        }
        self.timeline.settle(until);
    }

    fn replay(&mut self) {
        self.timeline.clear();
        self.core.reset();
        self.resistor_placed = false;
        self.battery_placed = false;
        self.powered = false;
        self.resistance = DEFAULT_RESISTANCE;
        self.readout_visible = false;
        self.challenge_started = false;
        self.game_active = false;
        self.matched = false;
        self.budget_timer = None;
        self.armed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::test_support::{run, settings};
    use crate::scoring::Stars;

    /// Resistance whose brightness lands on the target
    fn matching_resistance(target: u32) -> u32 {
        RESISTANCE_RANGE
            .min_by(|a, b| {
                let da = (brightness_percent(*a) - target as f32).abs();
                let db = (brightness_percent(*b) - target as f32).abs();
                da.total_cmp(&db)
            })
            .unwrap()
    }

    /// Whichever end of the knob is farthest from the target
    fn far_resistance(target: u32) -> u32 {
        if target >= 75 { 100 } else { 10 }
    }

    fn lesson_at_challenge() -> ResistorLesson {
        let mut lesson = ResistorLesson::new(&settings());
        lesson.place_resistor();
        run(&mut lesson, 1000);
        lesson.place_battery();
        lesson.power_on();
        run(&mut lesson, 1500 + 400);
        lesson.continue_exploring();
        lesson.start_challenge();
        lesson
    }

    #[test]
    fn test_ohms_law() {
        assert!((current_amps(50) - 0.18).abs() < 1e-6);
        assert!((brightness_percent(50) - 100.0).abs() < 1e-3);
        assert!((brightness_percent(100) - 50.0).abs() < 1e-3);
        assert_eq!(brightness_percent(10), 100.0);
        assert!((current_amps(0) - 9.0).abs() < 1e-6);
        assert_eq!(electron_lap_seconds(100), 1.5);
        assert_eq!(electron_lap_seconds(25), 4.0);
    }

    #[test]
    fn test_setup_steps() {
        let mut lesson = ResistorLesson::new(&settings());
        lesson.power_on();
        assert!(!lesson.powered());

        lesson.place_resistor();
        assert_eq!(lesson.step(), 0);
        run(&mut lesson, 999);
        assert_eq!(lesson.step(), 0);
        run(&mut lesson, 1);
        assert_eq!(lesson.step(), 1);

        lesson.power_on();
        assert!(!lesson.powered(), "power needs the battery first");
        lesson.place_battery();
        lesson.power_on();
        assert!(lesson.powered());
        run(&mut lesson, 1500);
        assert_eq!(lesson.step(), 2);
        assert!(!lesson.readout_visible());
        run(&mut lesson, 400);
        assert!(lesson.readout_visible());
    }

    #[test]
    fn test_slider_inert_before_readout() {
        let mut lesson = ResistorLesson::new(&settings());
        lesson.set_resistance(90);
        assert_eq!(lesson.resistance(), DEFAULT_RESISTANCE);
    }

    #[test]
    fn test_resistance_is_clamped() {
        let mut lesson = lesson_at_challenge();
        lesson.set_resistance(500);
        assert_eq!(lesson.resistance(), 100);
        lesson.set_resistance(0);
        assert_eq!(lesson.resistance(), 10);
    }

    #[test]
    fn test_match_wins_three_stars() {
        let mut lesson = lesson_at_challenge();
        assert_eq!(lesson.step(), 4);
        let target = lesson.target_brightness();
        assert!(TARGET_RANGE.contains(&target));

        // Not armed yet: a perfect match is ignored
        lesson.set_resistance(matching_resistance(target));
        assert!(lesson.stars().is_none());

        run(&mut lesson, 3000);
        assert!(lesson.game_active());
        lesson.set_resistance(far_resistance(target));
        assert!(lesson.stars().is_none());
        lesson.set_resistance(matching_resistance(target));
        assert_eq!(lesson.stars(), Some(Stars::THREE));
        assert!(!lesson.game_active());

        assert!(lesson.finish().is_none());
        run(&mut lesson, 1500);
        assert!(lesson.summary_visible());
        let completion = lesson.finish().unwrap();
        assert_eq!(completion.stage, StageKind::Resistor);
        assert_eq!(completion.stars, Stars::THREE);
        assert!(lesson.finish().is_none());
    }

    #[test]
    fn test_timeout_earns_two_stars() {
        let mut lesson = lesson_at_challenge();
        run(&mut lesson, 3000);
        assert!(lesson.time_left().is_some());
        lesson.set_resistance(far_resistance(lesson.target_brightness()));
        run(&mut lesson, 20_000);
        assert_eq!(lesson.stars(), Some(Stars::TWO));
        run(&mut lesson, 1500);
        assert_eq!(lesson.finish().map(|c| c.stars), Some(Stars::TWO));
    }

    #[test]
    fn test_replay_cancels_pending_phases() {
        let mut lesson = lesson_at_challenge();
        lesson.replay();
        assert_eq!(lesson.step(), 0);
        assert!(!lesson.resistor_placed());
        // The game arm timer from before the replay must not fire
        run(&mut lesson, 60_000);
        assert!(!lesson.game_active());
        assert_eq!(lesson.step(), 0);
        assert!(lesson.stars().is_none());
    }
}
