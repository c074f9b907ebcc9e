//! Facilities: the stateful regions transitions move in and out of.
//!
//! A [`Facility`] owns its lifecycle phase and the [`Elements`] whose
//! enter/exit conditions make up the wait set of a transition. Phase
//! changes go through the four `set_state_*` markers only, and require
//! `&mut Facility`: a facility is driven by a single test thread.

mod element;
pub mod error;

pub use element::{ConditionalElement, Element, Elements};
pub use error::PhaseError;

use crate::core::{FacilityPhase, PhaseChange, PhaseHistory};
use chrono::Utc;
use std::fmt;
use tracing::debug;

/// A UI region with a lifecycle and a set of elements.
///
/// # Example
///
/// ```rust
/// use transit::core::FacilityPhase;
/// use transit::facility::Facility;
///
/// let mut menu = Facility::new("AppMenu");
/// menu.set_state_transitioning_to(1).unwrap();
/// menu.set_state_active(1).unwrap();
/// assert_eq!(menu.phase(), FacilityPhase::Active);
///
/// // Finishing straight from Active skips TransitioningFrom.
/// assert!(menu.set_state_finished(1).is_err());
/// ```
#[derive(Debug)]
pub struct Facility {
    name: String,
    phase: FacilityPhase,
    elements: Elements,
    history: PhaseHistory,
}

impl Facility {
    /// Create a facility in the `New` phase.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_phase(name, FacilityPhase::New)
    }

    /// Create a facility that is already `Active`, e.g. the screen a test
    /// starts on.
    pub fn active(name: impl Into<String>) -> Self {
        Self::with_phase(name, FacilityPhase::Active)
    }

    fn with_phase(name: impl Into<String>, phase: FacilityPhase) -> Self {
        Self {
            name: name.into(),
            phase,
            elements: Elements::default(),
            history: PhaseHistory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> FacilityPhase {
        self.phase
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut Elements {
        &mut self.elements
    }

    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    pub fn set_state_transitioning_to(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.advance(FacilityPhase::TransitioningTo, attempt)
    }

    pub fn set_state_active(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.advance(FacilityPhase::Active, attempt)
    }

    pub fn set_state_transitioning_from(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.advance(FacilityPhase::TransitioningFrom, attempt)
    }

    pub fn set_state_finished(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.advance(FacilityPhase::Finished, attempt)
    }

    fn advance(&mut self, to: FacilityPhase, attempt: usize) -> Result<(), PhaseError> {
        if !self.phase.can_advance_to(to) {
            return Err(PhaseError::InvalidPhase {
                facility: self.name.clone(),
                from: self.phase,
                to,
            });
        }

        debug!(facility = %self.name, from = %self.phase, to = %to, "Facility phase change");
        self.history = self.history.record(PhaseChange {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            attempt,
        });
        self.phase = to;
        Ok(())
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<F: {}>", self.name)
    }
}
