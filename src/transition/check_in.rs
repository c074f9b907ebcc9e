//! Transition into a facility.

use crate::core::Condition;
use crate::facility::{Facility, PhaseError};
use crate::transition::error::TransitError;
use crate::waiter::{ConditionOrigin, ConditionWait, WaitFailure};
use std::sync::Arc;
use tracing::info;

/// Enters a [`Facility`]: marks it `TransitioningTo`, waits for every
/// enter condition, then marks it `Active`.
pub struct FacilityCheckIn<'f> {
    facility: &'f mut Facility,
}

impl<'f> FacilityCheckIn<'f> {
    pub fn new(facility: &'f mut Facility) -> Self {
        Self { facility }
    }

    pub fn facility(&self) -> &Facility {
        &*self.facility
    }

    pub(crate) fn on_before_transition(&mut self) -> Result<(), PhaseError> {
        self.facility.set_state_transitioning_to(0)?;
        info!(facility = %self.facility, "Will enter facility");
        Ok(())
    }

    pub(crate) fn on_triggered(&self) {
        info!(facility = %self.facility, "Triggered entry into facility");
    }

    pub(crate) fn create_waits(&self, transition_conditions: &[Arc<dyn Condition>]) -> Vec<ConditionWait> {
        let elements = self.facility.elements();

        let element_enters = elements
            .elements_in_state()
            .iter()
            .filter_map(|element| element.enter_condition());
        let other_enters = elements.other_enter_conditions().iter().cloned();

        element_enters
            .chain(other_enters)
            .map(|condition| ConditionWait::new(condition, ConditionOrigin::Enter))
            .chain(
                transition_conditions
                    .iter()
                    .cloned()
                    .map(|condition| ConditionWait::new(condition, ConditionOrigin::Transition)),
            )
            .collect()
    }

    pub(crate) fn on_after_transition(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.facility.set_state_active(attempt)?;
        info!(facility = %self.facility, "Entered facility");
        Ok(())
    }

    pub(crate) fn wrap_failure(&self, attempts: usize, failure: WaitFailure) -> TransitError {
        TransitError::EnterFacility {
            facility: self.facility.to_string(),
            attempts,
            source: failure,
        }
    }
}
