//! Inductor lesson: power a coil, watch its magnetic field build, flip the
//! current, then tap along with the pulsing field.

use std::time::Duration;

use serde::Serialize;

use super::{Lesson, LessonCore, LessonSettings, Mood, Prompt, PromptKind};
use crate::progress::StageKind;
use crate::scoring::stars_for_rhythm;
use crate::timeline::{TimerId, Timeline};

const MAX_FIELD: u32 = 100;
const FIELD_GROWTH: u32 = 2;
const TAP_BOOST: u32 = 15;

const CONNECTED_DELAY: Duration = Duration::from_millis(1000);
const SWITCH_DELAY: Duration = Duration::from_millis(1500);
const OBSERVE_DELAY: Duration = Duration::from_millis(3000);
const FIELD_TICK: Duration = Duration::from_millis(50);
const FIRST_PULSE: Duration = Duration::from_millis(750);
const PULSE_PERIOD: Duration = Duration::from_millis(1500);
const PULSE_WINDOW: Duration = Duration::from_millis(800);
const GAME_LENGTH: Duration = Duration::from_secs(12);
const SUMMARY_DELAY: Duration = Duration::from_millis(1500);

static PROMPTS: [Prompt; 5] = [
    Prompt {
        message: "Connect the wires to power the coil!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Tap the switch to send current through!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Watch the magnetic field grow around the coil!",
        kind: PromptKind::Learn,
    },
    Prompt {
        message: "Tap the flip button to reverse the current!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Mini-game: Tap in rhythm to sustain the swirl!",
        kind: PromptKind::Action,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrentDirection {
    #[default]
    Forward,
    Reverse,
}

impl CurrentDirection {
    fn flipped(self) -> Self {
        match self {
            CurrentDirection::Forward => CurrentDirection::Reverse,
            CurrentDirection::Reverse => CurrentDirection::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Step(usize),
    FieldTick,
    PulseOpen,
    PulseClose,
    GameOver,
    ShowSummary,
}

#[derive(Debug)]
pub struct InductorLesson {
    core: LessonCore,
    timeline: Timeline<Phase>,
    wire_left: bool,
    wire_right: bool,
    current_on: bool,
    field_strength: u32,
    direction: CurrentDirection,
    game_started: bool,
    game_active: bool,
    rhythm_score: u32,
    pulse_open: bool,
    pulse_scored: bool,
    field_timer: Option<TimerId>,
    pulse_timer: Option<TimerId>,
}

impl InductorLesson {
    pub fn new(settings: &LessonSettings) -> Self {
        Self {
            core: LessonCore::new(
                StageKind::Inductor,
                &PROMPTS,
                "Welcome to Inductor Galaxy!",
                settings,
            ),
            timeline: Timeline::new(),
            wire_left: false,
            wire_right: false,
            current_on: false,
            field_strength: 0,
            direction: CurrentDirection::default(),
            game_started: false,
            game_active: false,
            rhythm_score: 0,
            pulse_open: false,
            pulse_scored: false,
            field_timer: None,
            pulse_timer: None,
        }
    }

    pub fn wire_connected(&self, side: WireSide) -> bool {
        match side {
            WireSide::Left => self.wire_left,
            WireSide::Right => self.wire_right,
        }
    }

    pub fn current_on(&self) -> bool {
        self.current_on
    }

    /// Field strength in percent
    pub fn field_strength(&self) -> u32 {
        self.field_strength
    }

    pub fn direction(&self) -> CurrentDirection {
        self.direction
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn rhythm_score(&self) -> u32 {
        self.rhythm_score
    }

    /// True while a tap would count
    pub fn pulse_open(&self) -> bool {
        self.pulse_open
    }

    pub fn connect_wire(&mut self, side: WireSide) {
        if !self.core.accepts_input() || self.step() != 0 {
            return;
        }
        let already = (self.wire_left, self.wire_right);
        match side {
            WireSide::Left => self.wire_left = true,
            WireSide::Right => self.wire_right = true,
        }
        if self.wire_left && self.wire_right && already != (true, true) {
            self.core.say("Both wires connected! Power ready!", Mood::Celebrating);
            self.timeline.after(CONNECTED_DELAY, Phase::Step(1));
        }
    }

    pub fn switch_on(&mut self) {
        if !self.core.accepts_input() || self.step() != 1 || self.current_on {
            return;
        }
        self.current_on = true;
        self.start_field_growth();
        self.core.say(
            "Current flowing! Watch the magnetic field form!",
            Mood::Celebrating,
        );
        self.timeline.after(SWITCH_DELAY, Phase::Step(2));
    }

    pub fn flip_current(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 {
            return;
        }
        self.direction = self.direction.flipped();
        self.field_strength = 0;
        self.start_field_growth();
        let message = match self.direction {
            CurrentDirection::Reverse => "Current reversed! The field rebuilds the opposite way!",
            CurrentDirection::Forward => "Back to forward! Notice how the field changes!",
        };
        self.core.say(message, Mood::Encouraging);
    }

    pub fn start_game(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 || self.game_started {
            return;
        }
        self.game_started = true;
        self.game_active = true;
        self.rhythm_score = 0;
        self.stop_field_growth();
        self.core.go_to_step(4);
        self.core.say("Tap when the ring pulses bright!", Mood::Encouraging);
        self.pulse_timer = Some(
            self.timeline
                .every_from(FIRST_PULSE, PULSE_PERIOD, Phase::PulseOpen),
        );
        self.timeline.after(GAME_LENGTH, Phase::GameOver);
    }

    /// Tap along with the pulse. Each pulse counts at most once.
    /// Returns whether the tap scored.
    pub fn tap(&mut self) -> bool {
        if !self.game_active || !self.pulse_open || self.pulse_scored {
            return false;
        }
        self.pulse_scored = true;
        self.rhythm_score += 1;
        self.field_strength = (self.field_strength + TAP_BOOST).min(MAX_FIELD);
        true
    }

    fn start_field_growth(&mut self) {
        if self.field_timer.is_none() && self.field_strength < MAX_FIELD {
            self.field_timer = Some(self.timeline.every(FIELD_TICK, Phase::FieldTick));
        }
    }

    fn stop_field_growth(&mut self) {
        if let Some(timer) = self.field_timer.take() {
            self.timeline.cancel(timer);
        }
    }

    fn handle(&mut self, phase: Phase) {
        match phase {
            Phase::Step(1) => {
                self.core.go_to_step(1);
                self.core
                    .say("Now tap the switch to start the current!", Mood::Speaking);
            }
            Phase::Step(2) => {
                self.core.go_to_step(2);
                self.core.say(
                    "See those blue rings? That's the magnetic field!",
                    Mood::Speaking,
                );
                self.timeline.after(OBSERVE_DELAY, Phase::Step(3));
            }
            Phase::Step(3) => {
                self.core.go_to_step(3);
                self.core
                    .say("Try flipping the current direction!", Mood::Speaking);
            }
            Phase::Step(step) => self.core.go_to_step(step),
            Phase::FieldTick => {
                self.field_strength = (self.field_strength + FIELD_GROWTH).min(MAX_FIELD);
                if self.field_strength == MAX_FIELD {
                    self.stop_field_growth();
                }
            }
            Phase::PulseOpen => {
                if self.game_active {
                    self.pulse_open = true;
                    self.pulse_scored = false;
                    self.timeline.after(PULSE_WINDOW, Phase::PulseClose);
                }
            }
            Phase::PulseClose => self.pulse_open = false,
            Phase::GameOver => {
                self.game_active = false;
                self.pulse_open = false;
                if let Some(timer) = self.pulse_timer.take() {
                    self.timeline.cancel(timer);
                }
                self.core.say(
                    format!("Fantastic rhythm! Score: {}!", self.rhythm_score),
                    Mood::Celebrating,
                );
                self.core.resolve(stars_for_rhythm(self.rhythm_score));
                self.timeline.after(SUMMARY_DELAY, Phase::ShowSummary);
            }
            Phase::ShowSummary => self.core.show_summary(),
        }
    }
}

impl Lesson for InductorLesson {
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
        self.wire_left = false;
        self.wire_right = false;
        self.current_on = false;
        self.field_strength = 0;
        self.direction = CurrentDirection::default();
        self.game_started = false;
        self.game_active = false;
        self.rhythm_score = 0;
        self.pulse_open = false;
        self.pulse_scored = false;
        self.field_timer = None;
        self.pulse_timer = None;
    }
}
