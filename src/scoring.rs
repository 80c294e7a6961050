//! Star ratings, ranks and badges
//!
//! Every lesson ends in a mini-game whose outcome maps to 1-3 stars through one
//! of the fixed-threshold rules below.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rating a single stage can award
pub const MAX_STARS_PER_STAGE: u8 = 3;

/// A star rating in `1..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StarsError {
    #[error("star rating must be between 1 and {MAX_STARS_PER_STAGE}, got {0}")]
    OutOfRange(u8),
}

impl Stars {
    pub const ONE: Stars = Stars(1);
    pub const TWO: Stars = Stars(2);
    pub const THREE: Stars = Stars(3);

    pub fn new(value: u8) -> Result<Self, StarsError> {
        if (1..=MAX_STARS_PER_STAGE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StarsError::OutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = StarsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = "★".repeat(self.0 as usize);
        let empty = "☆".repeat((MAX_STARS_PER_STAGE - self.0) as usize);
        write!(f, "{filled}{empty}")
    }
}

/// Accuracy percentage game (capacitor balance): 90+ is perfect, 70+ is great.
pub fn stars_for_accuracy(accuracy: u32) -> Stars {
    if accuracy >= 90 {
        Stars::THREE
    } else if accuracy >= 70 {
        Stars::TWO
    } else {
        Stars::ONE
    }
}

/// Attempt-count puzzle (diode orientation): fewer attempts is better.
pub fn stars_for_attempts(attempts: u32) -> Stars {
    if attempts <= 2 {
        Stars::THREE
    } else if attempts <= 4 {
        Stars::TWO
    } else {
        Stars::ONE
    }
}

/// Rhythm game (inductor pulses): number of on-beat taps.
pub fn stars_for_rhythm(hits: u32) -> Stars {
    if hits >= 8 {
        Stars::THREE
    } else if hits >= 5 {
        Stars::TWO
    } else {
        Stars::ONE
    }
}

/// Brightness matching game (resistor): a match inside the time budget earns
/// full marks, running out of time still earns two.
pub fn stars_for_brightness_match(matched: bool) -> Stars {
    if matched { Stars::THREE } else { Stars::TWO }
}

/// Overall rank shown on the final celebration screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    ElectronRookie,
    CircuitExplorer,
    ElectronicsScientist,
    MasterEngineer,
}

impl Rank {
    pub fn for_total(total_stars: u32) -> Self {
        match total_stars {
            11.. => Rank::MasterEngineer,
            8..=10 => Rank::ElectronicsScientist,
            5..=7 => Rank::CircuitExplorer,
            _ => Rank::ElectronRookie,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rank::ElectronRookie => "Electron Rookie",
            Rank::CircuitExplorer => "Circuit Explorer",
            Rank::ElectronicsScientist => "Electronics Scientist",
            Rank::MasterEngineer => "Master Engineer",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Rank::ElectronRookie => "⚡",
            Rank::CircuitExplorer => "🚀",
            Rank::ElectronicsScientist => "🔬",
            Rank::MasterEngineer => "🏆",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.name())
    }
}

/// Badge awarded for finishing a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub name: &'static str,
    pub icon: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_range() {
        assert!(Stars::new(0).is_err());
        assert_eq!(Stars::new(1), Ok(Stars::ONE));
        assert_eq!(Stars::new(3), Ok(Stars::THREE));
        assert_eq!(Stars::new(4), Err(StarsError::OutOfRange(4)));
    }

    #[test]
    fn test_accuracy_thresholds() {
        assert_eq!(stars_for_accuracy(95), Stars::THREE);
        assert_eq!(stars_for_accuracy(90), Stars::THREE);
        assert_eq!(stars_for_accuracy(89), Stars::TWO);
        assert_eq!(stars_for_accuracy(75), Stars::TWO);
        assert_eq!(stars_for_accuracy(70), Stars::TWO);
        assert_eq!(stars_for_accuracy(69), Stars::ONE);
        assert_eq!(stars_for_accuracy(50), Stars::ONE);
    }

    #[test]
    fn test_attempt_thresholds() {
        assert_eq!(stars_for_attempts(1), Stars::THREE);
        assert_eq!(stars_for_attempts(2), Stars::THREE);
        assert_eq!(stars_for_attempts(3), Stars::TWO);
        assert_eq!(stars_for_attempts(4), Stars::TWO);
        assert_eq!(stars_for_attempts(5), Stars::ONE);
    }

    #[test]
    fn test_rhythm_thresholds() {
        assert_eq!(stars_for_rhythm(8), Stars::THREE);
        assert_eq!(stars_for_rhythm(7), Stars::TWO);
        assert_eq!(stars_for_rhythm(5), Stars::TWO);
        assert_eq!(stars_for_rhythm(4), Stars::ONE);
        assert_eq!(stars_for_rhythm(0), Stars::ONE);
    }

    #[test]
    fn test_brightness_match() {
        assert_eq!(stars_for_brightness_match(true), Stars::THREE);
        assert_eq!(stars_for_brightness_match(false), Stars::TWO);
    }

    #[test]
    fn test_rank_for_total() {
        assert_eq!(Rank::for_total(0), Rank::ElectronRookie);
        assert_eq!(Rank::for_total(4), Rank::ElectronRookie);
        assert_eq!(Rank::for_total(5), Rank::CircuitExplorer);
        assert_eq!(Rank::for_total(8), Rank::ElectronicsScientist);
        assert_eq!(Rank::for_total(10), Rank::ElectronicsScientist);
        assert_eq!(Rank::for_total(11), Rank::MasterEngineer);
        assert_eq!(Rank::for_total(12), Rank::MasterEngineer);
    }

    #[test]
    fn test_stars_serde() {
        assert_eq!(serde_json::to_string(&Stars::TWO).unwrap(), "2");
        let parsed: Stars = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Stars::THREE);
        assert!(serde_json::from_str::<Stars>("0").is_err());
    }

    #[test]
    fn test_stars_display() {
        assert_eq!(Stars::TWO.to_string(), "★★☆");
    }
}
