//! Diode lesson: wire the terminals, try both bias directions, then turn the
//! diode until current can light the LED.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::{Lesson, LessonCore, LessonSettings, Mood, Prompt, PromptKind};
use crate::progress::StageKind;
use crate::scoring::stars_for_attempts;
use crate::timeline::Timeline;

/// Rotations allowed before Sparky steps in and turns the diode
pub const MAX_ROTATIONS: u32 = 8;
const QUARTER_TURN: u16 = 90;
const WRONG_ORIENTATIONS: [u16; 3] = [90, 180, 270];

const CONNECTED_DELAY: Duration = Duration::from_millis(1000);
const FORWARD_DELAY: Duration = Duration::from_millis(2000);
const REVERSE_DELAY: Duration = Duration::from_millis(2500);
const SUMMARY_DELAY: Duration = Duration::from_millis(2000);

static PROMPTS: [Prompt; 4] = [
    Prompt {
        message: "Connect the wires to the diode terminals!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Toggle FORWARD BIAS and watch electrons flow!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Now try REVERSE BIAS!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Puzzle: Orient the diode to light the bulb!",
        kind: PromptKind::Action,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Anode,
    Cathode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    #[default]
    None,
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Step(usize),
    ShowSummary,
}

#[derive(Debug)]
pub struct DiodeLesson {
    core: LessonCore,
    timeline: Timeline<Phase>,
    rng: StdRng,
    anode: bool,
    cathode: bool,
    bias: Bias,
    forward_seen: bool,
    reverse_seen: bool,
    puzzle_active: bool,
    /// Degrees clockwise from the conducting orientation
    rotation: u16,
    attempts: u32,
    solved: bool,
}

impl DiodeLesson {
    pub fn new(settings: &LessonSettings) -> Self {
        Self {
            core: LessonCore::new(
                StageKind::Diode,
                &PROMPTS,
                "Welcome to Diode Dimension!",
                settings,
            ),
            timeline: Timeline::new(),
            rng: settings.rng(),
            anode: false,
            cathode: false,
            bias: Bias::default(),
            forward_seen: false,
            reverse_seen: false,
            puzzle_active: false,
            rotation: 0,
            attempts: 0,
            solved: false,
        }
    }

    pub fn terminal_connected(&self, terminal: Terminal) -> bool {
        match terminal {
            Terminal::Anode => self.anode,
            Terminal::Cathode => self.cathode,
        }
    }

    pub fn bias(&self) -> Bias {
        self.bias
    }

    /// Electrons make it through the diode
    pub fn conducting(&self) -> bool {
        if self.puzzle_active || self.solved {
            self.rotation == 0
        } else {
            self.bias == Bias::Forward
        }
    }

    pub fn puzzle_active(&self) -> bool {
        self.puzzle_active
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn bulb_lit(&self) -> bool {
        self.solved && self.rotation == 0
    }

    pub fn connect(&mut self, terminal: Terminal) {
        if !self.core.accepts_input() || self.step() != 0 {
            return;
        }
        let before = self.anode && self.cathode;
        match terminal {
            Terminal::Anode => self.anode = true,
            Terminal::Cathode => self.cathode = true,
        }
        if self.anode && self.cathode && !before {
            self.core.say(
                "Both terminals connected! Now try the bias modes!",
                Mood::Celebrating,
            );
            self.timeline.after(CONNECTED_DELAY, Phase::Step(1));
        }
    }

    pub fn set_bias(&mut self, bias: Bias) {
        if !self.core.accepts_input() || self.step() == 0 || self.puzzle_active {
            return;
        }
        self.bias = bias;
        match bias {
            Bias::Forward => {
                self.core.say(
                    "Forward bias! Electrons flow through like cars on a highway!",
                    Mood::Celebrating,
                );
                if self.step() == 1 && !self.forward_seen {
                    self.forward_seen = true;
                    self.timeline.after(FORWARD_DELAY, Phase::Step(2));
                }
            }
            Bias::Reverse => {
                self.core.say(
                    "Reverse bias! The electrons are BLOCKED! It's a one-way door!",
                    Mood::Encouraging,
                );
                if self.step() == 2 && !self.reverse_seen {
                    self.reverse_seen = true;
                    self.timeline.after(REVERSE_DELAY, Phase::Step(3));
                }
            }
            Bias::None => {}
        }
    }

    /// Start the puzzle with the diode turned the wrong way
    pub fn start_puzzle(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 || self.puzzle_active {
            return;
        }
        self.puzzle_active = true;
        self.attempts = 0;
        self.rotation = WRONG_ORIENTATIONS[self.rng.gen_range(0..WRONG_ORIENTATIONS.len())];
        tracing::debug!("Diode puzzle starts at {} degrees", self.rotation);
        self.core.say(
            "Rotate the diode so electrons can flow and light the LED!",
            Mood::Encouraging,
        );
    }

    pub fn rotate_clockwise(&mut self) {
        self.rotate(QUARTER_TURN);
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.rotate(360 - QUARTER_TURN);
    }

    fn rotate(&mut self, degrees: u16) {
        if !self.puzzle_active {
            return;
        }
        self.rotation = (self.rotation + degrees) % 360;
        self.attempts += 1;

        if self.rotation == 0 {
            self.core.say(
                "BRILLIANT! You solved it! The LED lights up!",
                Mood::Celebrating,
            );
            self.resolve_puzzle();
        } else if self.attempts >= MAX_ROTATIONS {
            self.rotation = 0;
            self.core.say(
                "Let me help! Arrow pointing from anode to cathode lets current through.",
                Mood::Encouraging,
            );
            self.resolve_puzzle();
        }
    }

    fn resolve_puzzle(&mut self) {
        self.puzzle_active = false;
        self.solved = true;
        self.core.resolve(stars_for_attempts(self.attempts));
        self.timeline.after(SUMMARY_DELAY, Phase::ShowSummary);
    }

    fn handle(&mut self, phase: Phase) {
        match phase {
            Phase::Step(1) => {
                self.core.go_to_step(1);
                self.core.say(
                    "Toggle to Forward Bias to see electrons flow!",
                    Mood::Speaking,
                );
            }
            Phase::Step(2) => {
                self.core.go_to_step(2);
                self.core
                    .say("Now try Reverse Bias to see what happens!", Mood::Speaking);
            }
            Phase::Step(3) => {
                self.core.go_to_step(3);
                self.core.say(
                    "Now for the puzzle. Can you light the LED?",
                    Mood::Speaking,
                );
            }
            Phase::Step(step) => self.core.go_to_step(step),
            Phase::ShowSummary => self.core.show_summary(),
        }
    }
}

impl Lesson for DiodeLesson {
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
        self.anode = false;
        self.cathode = false;
        self.bias = Bias::default();
        self.forward_seen = false;
        self.reverse_seen = false;
        self.puzzle_active = false;
        self.rotation = 0;
        self.attempts = 0;
        self.solved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::test_support::{run, settings};
    use crate::scoring::Stars;

    fn lesson_at_puzzle() -> DiodeLesson {
        let mut lesson = DiodeLesson::new(&settings());
        lesson.connect(Terminal::Anode);
        lesson.connect(Terminal::Cathode);
        run(&mut lesson, 1000);
        lesson.set_bias(Bias::Forward);
        run(&mut lesson, 2000);
        lesson.set_bias(Bias::Reverse);
        run(&mut lesson, 2500);
        lesson.start_puzzle();
        lesson
    }

    #[test]
    fn test_bias_walkthrough() {
        let mut lesson = DiodeLesson::new(&settings());
        lesson.set_bias(Bias::Forward);
        assert_eq!(lesson.bias(), Bias::None, "bias needs connected terminals");

        lesson.connect(Terminal::Cathode);
        run(&mut lesson, 2000);
        assert_eq!(lesson.step(), 0);
        lesson.connect(Terminal::Anode);
        run(&mut lesson, 1000);
        assert_eq!(lesson.step(), 1);

        // Reverse first does not skip ahead
        lesson.set_bias(Bias::Reverse);
        assert!(!lesson.conducting());
        run(&mut lesson, 5000);
        assert_eq!(lesson.step(), 1);

        lesson.set_bias(Bias::Forward);
        assert!(lesson.conducting());
        run(&mut lesson, 2000);
        assert_eq!(lesson.step(), 2);

        lesson.set_bias(Bias::Reverse);
        run(&mut lesson, 2499);
        assert_eq!(lesson.step(), 2);
        run(&mut lesson, 1);
        assert_eq!(lesson.step(), 3);
    }

    #[test]
    fn test_puzzle_starts_wrong() {
        let lesson = lesson_at_puzzle();
        assert!(lesson.puzzle_active());
        assert!(WRONG_ORIENTATIONS.contains(&lesson.rotation()));
        assert!(!lesson.conducting());
        assert_eq!(lesson.attempts(), 0);
    }

    #[test]
    fn test_shortest_path_earns_three_stars() {
        let mut lesson = lesson_at_puzzle();
        if lesson.rotation() == 90 {
            lesson.rotate_counter_clockwise();
        } else {
            while lesson.puzzle_active() {
                lesson.rotate_clockwise();
            }
        }
        assert!(lesson.bulb_lit());
        assert!(lesson.attempts() <= 2);
        assert_eq!(lesson.stars(), Some(Stars::THREE));
        run(&mut lesson, 2000);
        assert_eq!(lesson.finish().map(|c| c.stars), Some(Stars::THREE));
    }

    #[test]
    fn test_wandering_costs_stars() {
        let mut lesson = lesson_at_puzzle();
        // Spin away and back: 4 turns that never reach 0 from a wrong start
        let start = lesson.rotation();
        let away = if start == 270 {
            DiodeLesson::rotate_counter_clockwise
        } else {
            DiodeLesson::rotate_clockwise
        };
        let back = if start == 270 {
            DiodeLesson::rotate_clockwise
        } else {
            DiodeLesson::rotate_counter_clockwise
        };
        // 90 -> 180 -> 90, or 180 -> 270 -> 180, or 270 -> 180 -> 270
        away(&mut lesson);
        back(&mut lesson);
        away(&mut lesson);
        back(&mut lesson);
        assert!(lesson.puzzle_active());
        assert_eq!(lesson.attempts(), 4);

        while lesson.puzzle_active() {
            lesson.rotate_clockwise();
        }
        assert!(lesson.attempts() >= 5);
        assert_eq!(lesson.stars(), Some(Stars::ONE));
    }

    #[test]
    fn test_rotation_budget() {
        let mut lesson = lesson_at_puzzle();
        let start = lesson.rotation();
        let (away, back): (fn(&mut DiodeLesson), fn(&mut DiodeLesson)) = if start == 270 {
            (DiodeLesson::rotate_counter_clockwise, DiodeLesson::rotate_clockwise)
        } else {
            (DiodeLesson::rotate_clockwise, DiodeLesson::rotate_counter_clockwise)
        };
        for _ in 0..MAX_ROTATIONS / 2 {
            away(&mut lesson);
            back(&mut lesson);
        }
        assert!(!lesson.puzzle_active());
        assert_eq!(lesson.attempts(), MAX_ROTATIONS);
        assert!(lesson.bulb_lit());
        assert_eq!(lesson.stars(), Some(Stars::ONE));

        lesson.rotate_clockwise();
        assert_eq!(lesson.attempts(), MAX_ROTATIONS, "no turns after the puzzle ends");
    }

    #[test]
    fn test_replay_clears_puzzle() {
        let mut lesson = lesson_at_puzzle();
        lesson.rotate_clockwise();
        lesson.replay();
        assert!(!lesson.puzzle_active());
        assert_eq!(lesson.attempts(), 0);
        assert_eq!(lesson.step(), 0);
        assert!(!lesson.terminal_connected(Terminal::Anode));
    }
}
