//! Top-level session state machine
//!
//! `Welcome → Stage(Resistor) → … → Stage(Diode) → Complete`, plus the two
//! reset transitions out of `Complete`. Every transition is an explicit call;
//! calls that do not fit the current state are rejected and change nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{ProgressTracker, StageKind, StageRecord};
use crate::scoring::{Badge, Rank, Stars};

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", content = "stage", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Welcome,
    Stage(StageKind),
    Complete,
}

impl SessionState {
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            SessionState::Stage(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Welcome => write!(f, "welcome"),
            SessionState::Stage(kind) => write!(f, "stage {} ({})", kind.number(), kind.name()),
            SessionState::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} from {state}")]
    NotAllowed {
        action: &'static str,
        state: SessionState,
    },

    /// A completion arrived for a stage that is not the active one, e.g. a
    /// callback that outlived its lesson.
    #[error("stage index {reported} reported completion while {state} is active")]
    StaleCompletion {
        reported: usize,
        state: SessionState,
    },
}

/// Owns the session state and the progress tracker
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    state: SessionState,
    tracker: ProgressTracker,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Leave the welcome screen and enter the first stage
    pub fn start(&mut self) -> Result<SessionState, TransitionError> {
        if self.state != SessionState::Welcome {
            return Err(TransitionError::NotAllowed {
                action: "start",
                state: self.state,
            });
        }
        Ok(self.enter_first_stage())
    }

    /// Record the result of the active stage and move on.
    ///
    /// `stage_index` is zero-based and must name the active stage.
    pub fn complete_stage(
        &mut self,
        stage_index: usize,
        stars: Stars,
    ) -> Result<SessionState, TransitionError> {
        let active = match self.state {
            SessionState::Stage(kind) if kind.index() == stage_index => kind,
            _ => {
                return Err(TransitionError::StaleCompletion {
                    reported: stage_index,
                    state: self.state,
                });
            }
        };

        self.tracker.mark_completed(stage_index, stars);
        self.tracker.clear_current();

        self.state = match active.next() {
            Some(next) => {
                self.tracker.mark_current(next.index());
                SessionState::Stage(next)
            }
            None => SessionState::Complete,
        };

        tracing::info!(
            "{} stage finished with {} star(s), total {} -> {}",
            active.name(),
            stars.get(),
            self.tracker.total_stars(),
            self.state
        );
        Ok(self.state)
    }

    /// Reset progress and go straight back to the first stage
    pub fn play_again(&mut self) -> Result<SessionState, TransitionError> {
        if self.state != SessionState::Complete {
            return Err(TransitionError::NotAllowed {
                action: "play again",
                state: self.state,
            });
        }
        self.tracker.reset();
        Ok(self.enter_first_stage())
    }

    /// Reset progress and return to the welcome screen
    pub fn go_home(&mut self) -> Result<SessionState, TransitionError> {
        if self.state != SessionState::Complete {
            return Err(TransitionError::NotAllowed {
                action: "go home",
                state: self.state,
            });
        }
        self.tracker.reset();
        self.state = SessionState::Welcome;
        tracing::info!("Session reset, back to welcome screen");
        Ok(self.state)
    }

    fn enter_first_stage(&mut self) -> SessionState {
        let first = StageKind::ALL[0];
        self.tracker.mark_current(first.index());
        self.state = SessionState::Stage(first);
        tracing::info!("Session started at {}", self.state);
        self.state
    }

    /// Snapshot for the display layer
    pub fn view(&self) -> SessionView {
        let total_stars = self.tracker.total_stars();
        SessionView {
            state: self.state,
            stages: self.tracker.stages().to_vec(),
            total_stars,
            max_stars: self.tracker.max_stars(),
            rank: Rank::for_total(total_stars),
            badges: self.tracker.badges(),
            show_progress: matches!(self.state, SessionState::Stage(_)),
        }
    }
}

/// Everything a renderer needs to draw the current screen
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub stages: Vec<StageRecord>,
    pub total_stars: u32,
    pub max_stars: u32,
    pub rank: Rank,
    pub badges: Vec<Badge>,
    /// The progress constellation is only drawn while a stage is active
    pub show_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stars(n: u8) -> Stars {
        Stars::new(n).unwrap()
    }

    fn current_count(orchestrator: &Orchestrator) -> usize {
        orchestrator
            .tracker()
            .stages()
            .iter()
            .filter(|s| s.is_current())
            .count()
    }

    #[test]
    fn test_start() {
        let mut orchestrator = Orchestrator::new();
        assert_eq!(orchestrator.state(), SessionState::Welcome);
        assert_eq!(current_count(&orchestrator), 0);

        let state = orchestrator.start().unwrap();
        assert_eq!(state, SessionState::Stage(StageKind::Resistor));
        assert_eq!(orchestrator.tracker().current_index(), Some(0));

        assert!(matches!(
            orchestrator.start(),
            Err(TransitionError::NotAllowed { action: "start", .. })
        ));
    }

    #[test]
    fn test_full_run() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.start().unwrap();

        assert_eq!(
            orchestrator.complete_stage(0, stars(3)).unwrap(),
            SessionState::Stage(StageKind::Inductor)
        );
        assert_eq!(current_count(&orchestrator), 1);
        assert_eq!(
            orchestrator.complete_stage(1, stars(2)).unwrap(),
            SessionState::Stage(StageKind::Capacitor)
        );
        assert_eq!(
            orchestrator.complete_stage(2, stars(1)).unwrap(),
            SessionState::Stage(StageKind::Diode)
        );
        assert_eq!(
            orchestrator.complete_stage(3, stars(3)).unwrap(),
            SessionState::Complete
        );

        assert_eq!(orchestrator.tracker().total_stars(), 9);
        assert_eq!(current_count(&orchestrator), 0);
        assert_eq!(orchestrator.tracker().completed_count(), 4);
    }

    #[test]
    fn test_total_is_sum_of_stars() {
        for a in 1..=3u8 {
            for b in 1..=3u8 {
                let mut orchestrator = Orchestrator::new();
                orchestrator.start().unwrap();
                for (i, n) in [a, b, b, a].into_iter().enumerate() {
                    orchestrator.complete_stage(i, stars(n)).unwrap();
                }
                assert_eq!(orchestrator.state(), SessionState::Complete);
                assert_eq!(
                    orchestrator.tracker().total_stars(),
                    u32::from(2 * a + 2 * b)
                );
            }
        }
    }

    #[test]
    fn test_stale_completion_is_rejected() {
        let mut orchestrator = Orchestrator::new();
        assert!(matches!(
            orchestrator.complete_stage(0, stars(3)),
            Err(TransitionError::StaleCompletion { reported: 0, .. })
        ));

        orchestrator.start().unwrap();
        orchestrator.complete_stage(0, stars(3)).unwrap();
        // A late duplicate for the resistor stage must not touch the inductor
        let err = orchestrator.complete_stage(0, stars(1)).unwrap_err();
        assert!(matches!(err, TransitionError::StaleCompletion { reported: 0, .. }));
        assert_eq!(orchestrator.state(), SessionState::Stage(StageKind::Inductor));
        assert_eq!(orchestrator.tracker().total_stars(), 3);
        assert_eq!(orchestrator.tracker().current_index(), Some(1));
    }

    #[test]
    fn test_play_again() {
        let mut orchestrator = Orchestrator::new();
        assert!(orchestrator.play_again().is_err());

        orchestrator.start().unwrap();
        for i in 0..4 {
            orchestrator.complete_stage(i, stars(2)).unwrap();
        }
        let state = orchestrator.play_again().unwrap();
        assert_eq!(state, SessionState::Stage(StageKind::Resistor));
        let tracker = orchestrator.tracker();
        assert!(tracker.stages().iter().all(|s| !s.is_completed() && s.star_count() == 0));
        assert!(tracker.stages()[0].is_current());
        assert_eq!(current_count(&orchestrator), 1);
        assert_eq!(tracker.total_stars(), 0);
    }

    #[test]
    fn test_go_home() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.start().unwrap();
        assert!(orchestrator.go_home().is_err());
        for i in 0..4 {
            orchestrator.complete_stage(i, stars(3)).unwrap();
        }
        assert_eq!(orchestrator.go_home().unwrap(), SessionState::Welcome);
        assert_eq!(orchestrator.tracker(), &ProgressTracker::default());
        assert_eq!(current_count(&orchestrator), 0);
        assert!(orchestrator.start().is_ok());
    }

    #[test]
    fn test_view() {
        let mut orchestrator = Orchestrator::new();
        assert!(!orchestrator.view().show_progress);
        orchestrator.start().unwrap();
        orchestrator.complete_stage(0, stars(3)).unwrap();
        let view = orchestrator.view();
        assert!(view.show_progress);
        assert_eq!(view.total_stars, 3);
        assert_eq!(view.max_stars, 12);
        assert_eq!(view.badges.len(), 1);
        assert_eq!(view.rank, Rank::ElectronRookie);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"]["screen"], "stage");
        assert_eq!(json["state"]["stage"], "inductor");
    }
}
