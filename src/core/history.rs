//! Facility lifecycle history.
//!
//! Records every phase change a facility goes through. The history is
//! immutable: `record` returns a new history with the change appended.

use super::phase::FacilityPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    /// The phase being left
    pub from: FacilityPhase,
    /// The phase being entered
    pub to: FacilityPhase,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// Try number of the transition that caused the change (0 when the
    /// change happened outside any try, e.g. a before-hook)
    pub attempt: usize,
}

/// Ordered history of phase changes.
///
/// # Example
///
/// ```rust
/// use transit::core::{FacilityPhase, PhaseChange, PhaseHistory};
/// use chrono::Utc;
///
/// let history = PhaseHistory::new().record(PhaseChange {
///     from: FacilityPhase::Active,
///     to: FacilityPhase::TransitioningFrom,
///     timestamp: Utc::now(),
///     attempt: 0,
/// });
///
/// assert_eq!(
///     history.get_path(),
///     vec![&FacilityPhase::Active, &FacilityPhase::TransitioningFrom]
/// );
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PhaseHistory {
    changes: Vec<PhaseChange>,
}

impl PhaseHistory {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Record a change, returning a new history. The receiver is left
    /// untouched.
    pub fn record(&self, change: PhaseChange) -> Self {
        let mut changes = self.changes.clone();
        changes.push(change);
        Self { changes }
    }

    /// Phases traversed: the first `from`, then each `to`.
    pub fn get_path(&self) -> Vec<&FacilityPhase> {
        let mut path = Vec::new();
        if let Some(first) = self.changes.first() {
            path.push(&first.from);
        }
        for change in &self.changes {
            path.push(&change.to);
        }
        path
    }

    /// Time between the first and last recorded change.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.changes.first(), self.changes.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn changes(&self) -> &[PhaseChange] {
        &self.changes
    }

    pub fn last(&self) -> Option<&PhaseChange> {
        self.changes.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(from: FacilityPhase, to: FacilityPhase, attempt: usize) -> PhaseChange {
        PhaseChange {
            from,
            to,
            timestamp: Utc::now(),
            attempt,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = PhaseHistory::new();
        assert!(history.changes().is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = PhaseHistory::new();
        let new_history =
            history.record(change(FacilityPhase::New, FacilityPhase::TransitioningTo, 0));

        assert_eq!(history.changes().len(), 0);
        assert_eq!(new_history.changes().len(), 1);
    }

    #[test]
    fn get_path_returns_phase_sequence() {
        let history = PhaseHistory::new()
            .record(change(FacilityPhase::Active, FacilityPhase::TransitioningFrom, 0))
            .record(change(FacilityPhase::TransitioningFrom, FacilityPhase::Finished, 2));

        assert_eq!(
            history.get_path(),
            vec![
                &FacilityPhase::Active,
                &FacilityPhase::TransitioningFrom,
                &FacilityPhase::Finished
            ]
        );
        assert_eq!(history.last().map(|c| c.attempt), Some(2));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let history =
            PhaseHistory::new().record(change(FacilityPhase::New, FacilityPhase::TransitioningTo, 0));
        std::thread::sleep(Duration::from_millis(10));
        let history =
            history.record(change(FacilityPhase::TransitioningTo, FacilityPhase::Active, 1));

        assert!(history.duration().unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let history =
            PhaseHistory::new().record(change(FacilityPhase::Active, FacilityPhase::TransitioningFrom, 0));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: PhaseHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.changes(), history.changes());
    }
}
