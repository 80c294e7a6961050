//! Stage progress tracking
//!
//! The tracker holds one record per lesson, in lesson order. It is owned by the
//! [`Orchestrator`](crate::session::Orchestrator) and only mutated through it.

use serde::{Deserialize, Serialize};

use crate::scoring::{Badge, MAX_STARS_PER_STAGE, Stars};

/// The four lessons, in the order they are played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Resistor,
    Inductor,
    Capacitor,
    Diode,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::Resistor,
        StageKind::Inductor,
        StageKind::Capacitor,
        StageKind::Diode,
    ];

    /// Zero-based position in lesson order
    pub fn index(self) -> usize {
        match self {
            StageKind::Resistor => 0,
            StageKind::Inductor => 1,
            StageKind::Capacitor => 2,
            StageKind::Diode => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// One-based stage number
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// The stage after this one, if any
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Resistor => "Resistor",
            StageKind::Inductor => "Inductor",
            StageKind::Capacitor => "Capacitor",
            StageKind::Diode => "Diode",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            StageKind::Resistor => "🔶",
            StageKind::Inductor => "🔵",
            StageKind::Capacitor => "🟢",
            StageKind::Diode => "🔴",
        }
    }

    /// Theme tag used to look up the stage colors
    pub fn color_tag(self) -> &'static str {
        match self {
            StageKind::Resistor => "resistor",
            StageKind::Inductor => "inductor",
            StageKind::Capacitor => "capacitor",
            StageKind::Diode => "diode",
        }
    }

    pub fn badge(self) -> Badge {
        let name = match self {
            StageKind::Resistor => "Resistor Ranger",
            StageKind::Inductor => "Magnetic Master",
            StageKind::Capacitor => "Energy Guardian",
            StageKind::Diode => "Current Controller",
        };
        Badge {
            name,
            icon: self.icon(),
        }
    }
}

/// Progress of a single stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    kind: StageKind,
    completed: bool,
    current: bool,
    stars: Option<Stars>,
}

impl StageRecord {
    fn new(kind: StageKind) -> Self {
        Self {
            kind,
            completed: false,
            current: false,
            stars: None,
        }
    }

    pub fn id(&self) -> u8 {
        self.kind.number()
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    pub fn stars(&self) -> Option<Stars> {
        self.stars
    }

    /// Star count with 0 for stages not yet completed
    pub fn star_count(&self) -> u8 {
        self.stars.map(Stars::get).unwrap_or(0)
    }
}

/// Ordered per-stage progress plus the derived star total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTracker {
    stages: [StageRecord; 4],
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self {
            stages: StageKind::ALL.map(StageRecord::new),
        }
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[StageRecord] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&StageRecord> {
        self.stages.get(index)
    }

    /// Make `index` the only current stage. Out-of-range indices are ignored.
    pub fn mark_current(&mut self, index: usize) -> bool {
        if index >= self.stages.len() {
            return false;
        }
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.current = i == index;
        }
        true
    }

    /// Clear the current marker from every stage
    pub fn clear_current(&mut self) {
        for stage in &mut self.stages {
            stage.current = false;
        }
    }

    /// Record the result of a stage. A completed stage keeps its first result
    /// until the next [`reset`](Self::reset).
    pub fn mark_completed(&mut self, index: usize, stars: Stars) -> bool {
        let Some(stage) = self.stages.get_mut(index) else {
            return false;
        };
        if stage.completed {
            return false;
        }
        stage.completed = true;
        stage.current = false;
        stage.stars = Some(stars);
        true
    }

    /// Return every stage to its initial state
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            *stage = StageRecord::new(stage.kind);
        }
    }

    pub fn total_stars(&self) -> u32 {
        self.stages.iter().map(|s| u32::from(s.star_count())).sum()
    }

    pub fn max_stars(&self) -> u32 {
        self.stages.len() as u32 * u32::from(MAX_STARS_PER_STAGE)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.stages.iter().position(|s| s.current)
    }

    pub fn completed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.completed).count()
    }

    /// Badges of every completed stage, in lesson order
    pub fn badges(&self) -> Vec<Badge> {
        self.stages
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.kind.badge())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        for (i, kind) in StageKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(StageKind::from_index(i), Some(*kind));
        }
        assert_eq!(StageKind::from_index(4), None);
        assert_eq!(StageKind::Resistor.number(), 1);
        assert_eq!(StageKind::Capacitor.next(), Some(StageKind::Diode));
        assert_eq!(StageKind::Diode.next(), None);
    }

    #[test]
    fn test_default_tracker() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.stages().len(), 4);
        assert_eq!(tracker.total_stars(), 0);
        assert_eq!(tracker.max_stars(), 12);
        assert_eq!(tracker.current_index(), None);
        assert!(tracker.stages().iter().all(|s| !s.is_completed() && s.star_count() == 0));
        let ids: Vec<u8> = tracker.stages().iter().map(StageRecord::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mark_current_is_exclusive() {
        let mut tracker = ProgressTracker::new();
        assert!(tracker.mark_current(0));
        assert!(tracker.mark_current(2));
        assert_eq!(tracker.current_index(), Some(2));
        assert_eq!(tracker.stages().iter().filter(|s| s.is_current()).count(), 1);
        assert!(!tracker.mark_current(9));
        assert_eq!(tracker.current_index(), Some(2));
    }

    #[test]
    fn test_mark_completed_once() {
        let mut tracker = ProgressTracker::new();
        tracker.mark_current(1);
        assert!(tracker.mark_completed(1, Stars::TWO));
        assert!(!tracker.stages()[1].is_current());
        assert!(!tracker.mark_completed(1, Stars::THREE));
        assert_eq!(tracker.stages()[1].stars(), Some(Stars::TWO));
        assert_eq!(tracker.total_stars(), 2);
    }

    #[test]
    fn test_total_and_badges() {
        let mut tracker = ProgressTracker::new();
        tracker.mark_completed(0, Stars::THREE);
        tracker.mark_completed(3, Stars::ONE);
        assert_eq!(tracker.total_stars(), 4);
        assert_eq!(tracker.completed_count(), 2);
        let names: Vec<&str> = tracker.badges().iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Resistor Ranger", "Current Controller"]);
    }

    #[test]
    fn test_reset() {
        let mut tracker = ProgressTracker::new();
        tracker.mark_completed(0, Stars::THREE);
        tracker.mark_current(1);
        tracker.reset();
        assert_eq!(tracker, ProgressTracker::default());
    }

    #[test]
    fn test_serializes_to_json() {
        let mut tracker = ProgressTracker::new();
        tracker.mark_completed(0, Stars::THREE);
        let json = serde_json::to_value(&tracker).unwrap();
        assert_eq!(json["stages"][0]["kind"], "resistor");
        assert_eq!(json["stages"][0]["stars"], 3);
        assert!(json["stages"][1]["stars"].is_null());
    }
}
