//! Transition out of a facility.

use crate::core::Condition;
use crate::facility::{Facility, PhaseError};
use crate::transition::error::TransitError;
use crate::waiter::{ConditionOrigin, ConditionWait, WaitFailure};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Leaves a [`Facility`]: marks it `TransitioningFrom`, waits for every
/// exit condition, then marks it `Finished`.
pub struct FacilityCheckOut<'f> {
    facility: &'f mut Facility,
}

impl<'f> FacilityCheckOut<'f> {
    pub fn new(facility: &'f mut Facility) -> Self {
        Self { facility }
    }

    pub fn facility(&self) -> &Facility {
        &*self.facility
    }

    pub(crate) fn on_before_transition(&mut self) -> Result<(), PhaseError> {
        self.facility.set_state_transitioning_from(0)?;
        info!(facility = %self.facility, "Will exit facility");
        Ok(())
    }

    pub(crate) fn on_triggered(&self) {
        info!(facility = %self.facility, "Triggered exit from facility");
    }

    /// Exit conditions of elements in state, then facility-level exit
    /// conditions, then the transition's own conditions.
    pub(crate) fn create_waits(&self, transition_conditions: &[Arc<dyn Condition>]) -> Vec<ConditionWait> {
        let elements = self.facility.elements();
        let nothing_persists = HashSet::new();

        let element_exits = elements
            .elements_in_state()
            .iter()
            .filter_map(|element| element.exit_condition(&nothing_persists));
        let other_exits = elements.other_exit_conditions().iter().cloned();

        element_exits
            .chain(other_exits)
            .map(|condition| ConditionWait::new(condition, ConditionOrigin::Exit))
            .chain(
                transition_conditions
                    .iter()
                    .cloned()
                    .map(|condition| ConditionWait::new(condition, ConditionOrigin::Transition)),
            )
            .collect()
    }

    pub(crate) fn on_after_transition(&mut self, attempt: usize) -> Result<(), PhaseError> {
        self.facility.set_state_finished(attempt)?;
        info!(facility = %self.facility, "Exited facility");
        Ok(())
    }

    pub(crate) fn wrap_failure(&self, attempts: usize, failure: WaitFailure) -> TransitError {
        TransitError::ExitFacility {
            facility: self.facility.to_string(),
            attempts,
            source: failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FacilityPhase, FnCondition};
    use crate::facility::ConditionalElement;

    fn condition(name: &str) -> Arc<dyn Condition> {
        FnCondition::predicate(name, || true).shared()
    }

    #[test]
    fn waits_come_from_elements_facility_and_transition() {
        let mut facility = Facility::active("Menu");
        facility.elements_mut().declare_element(Arc::new(
            ConditionalElement::new("item").with_exit_condition(condition("Item gone")),
        ));
        facility
            .elements_mut()
            .declare_element(Arc::new(ConditionalElement::new("no_exit")));
        facility
            .elements_mut()
            .declare_exit_condition(condition("Scrim gone"));

        let check_out = FacilityCheckOut::new(&mut facility);
        let waits = check_out.create_waits(&[condition("Click handled")]);

        let described: Vec<(ConditionOrigin, String)> = waits
            .iter()
            .map(|w| (w.origin(), w.condition().description()))
            .collect();
        assert_eq!(
            described,
            vec![
                (ConditionOrigin::Exit, "Item gone".to_string()),
                (ConditionOrigin::Exit, "Scrim gone".to_string()),
                (ConditionOrigin::Transition, "Click handled".to_string()),
            ]
        );
    }

    #[test]
    fn enter_conditions_are_ignored() {
        let mut facility = Facility::active("Menu");
        facility
            .elements_mut()
            .declare_enter_condition(condition("Menu shown"));

        let check_out = FacilityCheckOut::new(&mut facility);
        assert!(check_out.create_waits(&[]).is_empty());
    }

    #[test]
    fn hooks_drive_facility_lifecycle() {
        let mut facility = Facility::active("Menu");
        {
            let mut check_out = FacilityCheckOut::new(&mut facility);
            check_out.on_before_transition().unwrap();
            assert_eq!(check_out.facility().phase(), FacilityPhase::TransitioningFrom);
            check_out.on_after_transition(2).unwrap();
        }
        assert_eq!(facility.phase(), FacilityPhase::Finished);
        assert_eq!(facility.history().last().unwrap().attempt, 2);
    }

    #[test]
    fn before_hook_rejects_inactive_facility() {
        let mut facility = Facility::new("Menu");
        let mut check_out = FacilityCheckOut::new(&mut facility);
        assert!(check_out.on_before_transition().is_err());
    }
}
