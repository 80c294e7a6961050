//! Capacitor lesson: charge the plates, discharge them in a flash, then balance
//! the charge against a target level.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use super::{Lesson, LessonCore, LessonSettings, Mood, Prompt, PromptKind};
use crate::progress::StageKind;
use crate::scoring::stars_for_accuracy;
use crate::timeline::{TimerId, Timeline};

const FULL_CHARGE: u32 = 100;
const CHARGE_STEP: u32 = 2;
const BALANCE_STEP: u32 = 10;
const TARGET_RANGE: Range<u32> = 20..80;

const CONNECTED_DELAY: Duration = Duration::from_millis(1000);
const CHARGE_TICK: Duration = Duration::from_millis(80);
const FULL_DELAY: Duration = Duration::from_millis(500);
const FLASH_LENGTH: Duration = Duration::from_millis(2000);
const SUMMARY_DELAY: Duration = Duration::from_millis(1500);

static PROMPTS: [Prompt; 5] = [
    Prompt {
        message: "Drag the battery to connect the circuit!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Press START CHARGE to begin storing energy!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Watch the energy gauge fill up!",
        kind: PromptKind::Learn,
    },
    Prompt {
        message: "The capacitor is full! Press DISCHARGE!",
        kind: PromptKind::Action,
    },
    Prompt {
        message: "Mini-game: Balance electrons to hit the target!",
        kind: PromptKind::Action,
    },
];

/// Accuracy of a balance attempt, in percent
pub fn balance_accuracy(player: u32, target: u32) -> u32 {
    100u32.saturating_sub(player.abs_diff(target))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Step(usize),
    ChargeTick,
    FlashOver,
    ShowSummary,
}

#[derive(Debug)]
pub struct CapacitorLesson {
    core: LessonCore,
    timeline: Timeline<Phase>,
    rng: StdRng,
    battery_connected: bool,
    charging: bool,
    charge_level: u32,
    flashing: bool,
    discharged: bool,
    game_active: bool,
    target_charge: u32,
    player_charge: u32,
    accuracy: Option<u32>,
    charge_timer: Option<TimerId>,
}

impl CapacitorLesson {
    pub fn new(settings: &LessonSettings) -> Self {
        Self {
            core: LessonCore::new(
                StageKind::Capacitor,
                &PROMPTS,
                "Welcome to Capacitor Cosmos!",
                settings,
            ),
            timeline: Timeline::new(),
            rng: settings.rng(),
            battery_connected: false,
            charging: false,
            charge_level: 0,
            flashing: false,
            discharged: false,
            game_active: false,
            target_charge: 50,
            player_charge: 0,
            accuracy: None,
            charge_timer: None,
        }
    }

    pub fn battery_connected(&self) -> bool {
        self.battery_connected
    }

    pub fn charging(&self) -> bool {
        self.charging
    }

    pub fn charge_level(&self) -> u32 {
        self.charge_level
    }

    /// Discharge flash is on screen
    pub fn flashing(&self) -> bool {
        self.flashing
    }

    pub fn discharged(&self) -> bool {
        self.discharged
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn target_charge(&self) -> u32 {
        self.target_charge
    }

    pub fn player_charge(&self) -> u32 {
        self.player_charge
    }

    pub fn accuracy(&self) -> Option<u32> {
        self.accuracy
    }

    pub fn connect_battery(&mut self) {
        if !self.core.accepts_input() || self.step() != 0 || self.battery_connected {
            return;
        }
        self.battery_connected = true;
        self.core
            .say("Battery connected! Ready to charge!", Mood::Celebrating);
        self.timeline.after(CONNECTED_DELAY, Phase::Step(1));
    }

    pub fn start_charge(&mut self) {
        if !self.core.accepts_input() || self.step() != 1 || self.charging {
            return;
        }
        self.charging = true;
        self.core.go_to_step(2);
        self.core
            .say("Electrons are flowing onto the plates!", Mood::Encouraging);
        self.charge_timer = Some(self.timeline.every(CHARGE_TICK, Phase::ChargeTick));
    }

    pub fn discharge(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 || self.charge_level != FULL_CHARGE {
            return;
        }
        self.charge_level = 0;
        self.flashing = true;
        self.discharged = true;
        self.core.say("BOOM! Energy released in a flash!", Mood::Celebrating);
        self.timeline.after(FLASH_LENGTH, Phase::FlashOver);
    }

    /// Open the balance game. Needs one discharge first.
    pub fn start_game(&mut self) {
        if !self.core.accepts_input() || self.step() != 3 || !self.discharged {
            return;
        }
        self.core.go_to_step(4);
        self.game_active = true;
        self.player_charge = 0;
        self.target_charge = self.rng.gen_range(TARGET_RANGE);
        tracing::debug!("Capacitor charge target: {}%", self.target_charge);
        self.core.say("Match the target charge level!", Mood::Encouraging);
    }

    pub fn add_charge(&mut self) {
        if self.game_active {
            self.player_charge = (self.player_charge + BALANCE_STEP).min(FULL_CHARGE);
        }
    }

    pub fn remove_charge(&mut self) {
        if self.game_active {
            self.player_charge = self.player_charge.saturating_sub(BALANCE_STEP);
        }
    }

    /// Lock in the current charge and score it
    pub fn submit(&mut self) {
        if !self.game_active {
            return;
        }
        self.game_active = false;
        let accuracy = balance_accuracy(self.player_charge, self.target_charge);
        self.accuracy = Some(accuracy);

        let praise = if accuracy >= 90 {
            "Perfect!"
        } else if accuracy >= 70 {
            "Great!"
        } else {
            "Good try!"
        };
        self.core
            .say(format!("{praise} {accuracy}% accuracy!"), Mood::Celebrating);
        self.core.resolve(stars_for_accuracy(accuracy));
        self.timeline.after(SUMMARY_DELAY, Phase::ShowSummary);
    }

    fn handle(&mut self, phase: Phase) {
        match phase {
            Phase::Step(1) => {
                self.core.go_to_step(1);
                self.core
                    .say("Press the charge button to start!", Mood::Speaking);
            }
            Phase::Step(step) => self.core.go_to_step(step),
            Phase::ChargeTick => {
                self.charge_level = (self.charge_level + CHARGE_STEP).min(FULL_CHARGE);
                if self.charge_level == FULL_CHARGE {
                    self.charging = false;
                    if let Some(timer) = self.charge_timer.take() {
                        self.timeline.cancel(timer);
                    }
                    self.core
                        .say("Fully charged! Now release the energy!", Mood::Celebrating);
                    self.timeline.after(FULL_DELAY, Phase::Step(3));
                }
            }
            Phase::FlashOver => {
                self.flashing = false;
                self.core
                    .say("Amazing! Now try the balance game!", Mood::Speaking);
            }
            Phase::ShowSummary => self.core.show_summary(),
        }
    }
}

impl Lesson for CapacitorLesson {
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
        self.battery_connected = false;
        self.charging = false;
        self.charge_level = 0;
        self.flashing = false;
        self.discharged = false;
        self.game_active = false;
        self.player_charge = 0;
        self.accuracy = None;
        self.charge_timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::test_support::{run, settings};
    use crate::scoring::Stars;

    fn lesson_at_game() -> CapacitorLesson {
        let mut lesson = CapacitorLesson::new(&settings());
        lesson.connect_battery();
        run(&mut lesson, 1000);
        lesson.start_charge();
        // 50 ticks of 80 ms to fill, then the 500 ms pause
        run(&mut lesson, 50 * 80 + 500);
        lesson.discharge();
        lesson.start_game();
        lesson
    }

    fn dial_to(lesson: &mut CapacitorLesson, level: u32) {
        while lesson.player_charge() < level {
            lesson.add_charge();
        }
        while lesson.player_charge() > level {
            lesson.remove_charge();
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(balance_accuracy(50, 50), 100);
        assert_eq!(balance_accuracy(40, 50), 90);
        assert_eq!(balance_accuracy(100, 20), 20);
        assert_eq!(balance_accuracy(0, 0), 100);
    }

    #[test]
    fn test_charge_cycle() {
        let mut lesson = CapacitorLesson::new(&settings());
        lesson.start_charge();
        assert!(!lesson.charging(), "needs a battery first");

        lesson.connect_battery();
        run(&mut lesson, 1000);
        assert_eq!(lesson.step(), 1);

        lesson.start_charge();
        assert_eq!(lesson.step(), 2);
        run(&mut lesson, 800);
        assert_eq!(lesson.charge_level(), 20);

        lesson.discharge();
        assert_eq!(lesson.charge_level(), 20, "cannot discharge while filling");

        run(&mut lesson, 40 * 80);
        assert_eq!(lesson.charge_level(), 100);
        assert!(!lesson.charging());
        assert_eq!(lesson.step(), 2);
        run(&mut lesson, 500);
        assert_eq!(lesson.step(), 3);

        lesson.start_game();
        assert_eq!(lesson.step(), 3, "game needs a discharge first");

        lesson.discharge();
        assert_eq!(lesson.charge_level(), 0);
        assert!(lesson.flashing());
        run(&mut lesson, 2000);
        assert!(!lesson.flashing());
    }

    #[test]
    fn test_balance_limits() {
        let mut lesson = lesson_at_game();
        assert!(lesson.game_active());
        lesson.remove_charge();
        assert_eq!(lesson.player_charge(), 0);
        for _ in 0..15 {
            lesson.add_charge();
        }
        assert_eq!(lesson.player_charge(), 100);
    }

    #[test]
    fn test_close_balance_scores_three() {
        let mut lesson = lesson_at_game();
        let target = lesson.target_charge();
        assert!(TARGET_RANGE.contains(&target));
        dial_to(&mut lesson, target / 10 * 10);
        lesson.submit();
        assert!(lesson.accuracy().unwrap() >= 90);
        assert_eq!(lesson.stars(), Some(Stars::THREE));

        // Submitting twice changes nothing
        lesson.add_charge();
        lesson.submit();
        assert_eq!(lesson.stars(), Some(Stars::THREE));

        run(&mut lesson, 1500);
        assert_eq!(lesson.finish().map(|c| c.stars), Some(Stars::THREE));
    }

    #[test]
    fn test_far_balance_scores_one() {
        let mut lesson = lesson_at_game();
        let target = lesson.target_charge();
        let far = if target < 50 { 100 } else { 0 };
        dial_to(&mut lesson, far);
        lesson.submit();
        assert!(lesson.accuracy().unwrap() < 70);
        assert_eq!(lesson.stars(), Some(Stars::ONE));
    }

    #[test]
    fn test_replay_stops_charging() {
        let mut lesson = CapacitorLesson::new(&settings());
        lesson.connect_battery();
        run(&mut lesson, 1000);
        lesson.start_charge();
        run(&mut lesson, 400);
        lesson.replay();
        run(&mut lesson, 10_000);
        assert_eq!(lesson.charge_level(), 0);
        assert_eq!(lesson.step(), 0);
    }
}
