//! Staggered reveal of screen sections

use std::time::Duration;

use crate::timeline::Timeline;

/// Sections of the welcome and celebration screens that fade in on a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPart {
    WelcomeContent,
    CelebrationPanel,
    CelebrationBadges,
    CelebrationRank,
}

pub const WELCOME: [(Duration, RevealPart); 1] =
    [(Duration::from_millis(200), RevealPart::WelcomeContent)];

pub const CELEBRATION: [(Duration, RevealPart); 3] = [
    (Duration::from_millis(100), RevealPart::CelebrationPanel),
    (Duration::from_millis(1000), RevealPart::CelebrationBadges),
    (Duration::from_millis(2000), RevealPart::CelebrationRank),
];

/// Parts shown so far plus the timers for the rest. Dropping the sequence
/// drops its timers.
#[derive(Debug)]
pub struct RevealSequence {
    timeline: Timeline<RevealPart>,
    shown: Vec<RevealPart>,
}

impl RevealSequence {
    /// Schedule `parts`, or show them all at once when `reduce_motion` is set
    pub fn new(parts: &[(Duration, RevealPart)], reduce_motion: bool) -> Self {
        let mut timeline = Timeline::new();
        let mut shown = Vec::new();
        for &(delay, part) in parts {
            if reduce_motion {
                shown.push(part);
            } else {
                timeline.after(delay, part);
            }
        }
        Self { timeline, shown }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.shown.extend(self.timeline.advance(dt));
    }

    pub fn is_shown(&self, part: RevealPart) -> bool {
        self.shown.contains(&part)
    }

    /// Nothing left to reveal
    pub fn is_done(&self) -> bool {
        self.timeline.pending() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celebration_staggers() {
        let mut reveal = RevealSequence::new(&CELEBRATION, false);
        assert!(!reveal.is_shown(RevealPart::CelebrationPanel));

        reveal.advance(Duration::from_millis(100));
        assert!(reveal.is_shown(RevealPart::CelebrationPanel));
        assert!(!reveal.is_shown(RevealPart::CelebrationBadges));

        reveal.advance(Duration::from_millis(900));
        assert!(reveal.is_shown(RevealPart::CelebrationBadges));
        assert!(!reveal.is_shown(RevealPart::CelebrationRank));
        assert!(!reveal.is_done());

        reveal.advance(Duration::from_millis(1000));
        assert!(reveal.is_shown(RevealPart::CelebrationRank));
        assert!(reveal.is_done());
    }

    #[test]
    fn test_reduce_motion_shows_everything() {
        let reveal = RevealSequence::new(&CELEBRATION, true);
        assert!(reveal.is_done());
        for (_, part) in CELEBRATION {
            assert!(reveal.is_shown(part));
        }
    }

    #[test]
    fn test_welcome_waits() {
        let mut reveal = RevealSequence::new(&WELCOME, false);
        reveal.advance(Duration::from_millis(199));
        assert!(!reveal.is_shown(RevealPart::WelcomeContent));
        reveal.advance(Duration::from_millis(1));
        assert!(reveal.is_shown(RevealPart::WelcomeContent));
    }
}
