//! Transitions: trigger an action, wait for conditions, retry as a unit.
//!
//! A [`Transition`] runs one logical state change of a facility:
//!
//! 1. the before-hook marks the facility as transitioning,
//! 2. the wait set is built from the facility's elements and the
//!    transition's own conditions,
//! 3. each try fires the trigger and polls the wait set,
//! 4. after a successful try the after-hook marks the facility's new
//!    phase and the [`AfterTransitionHook`] runs.
//!
//! Failed tries are logged and retried while tries remain; only the last
//! failure reaches the caller.
//!
//! The concrete transitions ([`FacilityCheckIn`], [`FacilityCheckOut`])
//! form the closed set [`FacilityTransition`], dispatched by `match`.

mod builder;
mod check_in;
mod check_out;
pub mod error;
mod options;

pub use builder::TransitionBuilder;
pub use check_in::FacilityCheckIn;
pub use check_out::FacilityCheckOut;
pub use error::{OptionsViolation, TransitError};
pub use options::{TransitionOptions, TransitionOptionsBuilder, DEFAULT_TIMEOUT};

use crate::config::AfterTransitionHook;
use crate::core::Condition;
use crate::facility::{Facility, PhaseError};
use crate::waiter::{wait_for, ConditionWait, WaitFailure, WaitReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Action that sets a transition in motion, e.g. clicking a view.
/// Fired once per try.
pub type Trigger = Box<dyn FnMut()>;

/// Where a transition is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionStage {
    NotStarted,
    BeforeHook,
    Triggered,
    Waiting,
    Succeeded,
    Failed,
}

/// Which concrete transition is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    CheckIn,
    CheckOut,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        })
    }
}

/// The closed set of concrete transitions.
pub enum FacilityTransition<'f> {
    CheckIn(FacilityCheckIn<'f>),
    CheckOut(FacilityCheckOut<'f>),
}

impl<'f> FacilityTransition<'f> {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::CheckIn(_) => TransitionKind::CheckIn,
            Self::CheckOut(_) => TransitionKind::CheckOut,
        }
    }

    pub fn facility(&self) -> &Facility {
        match self {
            Self::CheckIn(t) => t.facility(),
            Self::CheckOut(t) => t.facility(),
        }
    }

    fn on_before_transition(&mut self) -> Result<(), PhaseError> {
        match self {
            Self::CheckIn(t) => t.on_before_transition(),
            Self::CheckOut(t) => t.on_before_transition(),
        }
    }

    fn on_triggered(&self) {
        match self {
            Self::CheckIn(t) => t.on_triggered(),
            Self::CheckOut(t) => t.on_triggered(),
        }
    }

    fn create_waits(&self, transition_conditions: &[Arc<dyn Condition>]) -> Vec<ConditionWait> {
        match self {
            Self::CheckIn(t) => t.create_waits(transition_conditions),
            Self::CheckOut(t) => t.create_waits(transition_conditions),
        }
    }

    fn on_after_transition(&mut self, attempt: usize) -> Result<(), PhaseError> {
        match self {
            Self::CheckIn(t) => t.on_after_transition(attempt),
            Self::CheckOut(t) => t.on_after_transition(attempt),
        }
    }

    fn wrap_failure(&self, attempts: usize, failure: WaitFailure) -> TransitError {
        match self {
            Self::CheckIn(t) => t.wrap_failure(attempts, failure),
            Self::CheckOut(t) => t.wrap_failure(attempts, failure),
        }
    }
}

/// Outcome of a successful transition.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionReport {
    pub id: Uuid,
    pub kind: TransitionKind,
    pub facility: String,
    /// Tries used, the successful one included.
    pub attempts: usize,
    pub elapsed: Duration,
    /// The wait of the successful try.
    pub wait: WaitReport,
}

impl TransitionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One trigger+wait state change of a facility, retried as a unit.
///
/// Built with [`TransitionBuilder`].
pub struct Transition<'f> {
    id: Uuid,
    target: FacilityTransition<'f>,
    options: TransitionOptions,
    trigger: Option<Trigger>,
    transition_conditions: Vec<Arc<dyn Condition>>,
    after_hook: Box<dyn AfterTransitionHook>,
    stage: TransitionStage,
}

impl<'f> Transition<'f> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TransitionKind {
        self.target.kind()
    }

    pub fn options(&self) -> &TransitionOptions {
        &self.options
    }

    pub fn stage(&self) -> TransitionStage {
        self.stage
    }

    pub fn facility(&self) -> &Facility {
        self.target.facility()
    }

    /// e.g. `check-out <F: AppMenu>`
    pub fn subject(&self) -> String {
        format!("{} {}", self.kind(), self.facility())
    }

    /// Run the transition to completion. Can be called once.
    pub fn execute(&mut self) -> Result<TransitionReport, TransitError> {
        if self.stage != TransitionStage::NotStarted {
            return Err(TransitError::AlreadyExecuted {
                subject: self.subject(),
            });
        }
        self.options.ensure_valid()?;

        let subject = self.subject();
        let span = info_span!("transition", id = %self.id, subject = %subject);
        let _entered = span.enter();
        let started = Instant::now();

        self.stage = TransitionStage::BeforeHook;
        if let Err(e) = self.target.on_before_transition() {
            self.stage = TransitionStage::Failed;
            return Err(e.into());
        }
        let waits = self.target.create_waits(&self.transition_conditions);
        let tries = self.options.tries();

        let (attempts, wait) = if tries == 1 {
            match self.attempt(1, &waits) {
                Ok(report) => (1, report),
                Err(failure) => return Err(self.fail(1, failure)),
            }
        } else {
            let mut try_number = 1;
            loop {
                match self.attempt(try_number, &waits) {
                    Ok(report) => break (try_number, report),
                    Err(failure) if try_number < tries => {
                        warn!(
                            try_number,
                            tries,
                            error = %failure.reason,
                            "Try #{try_number} failed"
                        );
                        try_number += 1;
                    }
                    Err(failure) => return Err(self.fail(try_number, failure)),
                }
            }
        };

        if let Err(e) = self.target.on_after_transition(attempts) {
            self.stage = TransitionStage::Failed;
            return Err(e.into());
        }
        self.stage = TransitionStage::Succeeded;
        self.after_hook.after_transition(&subject);

        Ok(TransitionReport {
            id: self.id,
            kind: self.kind(),
            facility: self.facility().name().to_string(),
            attempts,
            elapsed: started.elapsed(),
            wait,
        })
    }

    fn attempt(&mut self, try_number: usize, waits: &[ConditionWait]) -> Result<WaitReport, WaitFailure> {
        self.stage = TransitionStage::Triggered;
        if let Some(trigger) = self.trigger.as_mut() {
            trigger();
        }
        self.target.on_triggered();

        let tries = self.options.tries();
        if tries == 1 {
            info!(facility = %self.facility(), "Triggered transition, waiting");
        } else {
            info!(
                try_number,
                tries,
                facility = %self.facility(),
                "Triggered transition (try #{try_number}/{tries}), waiting"
            );
        }

        self.stage = TransitionStage::Waiting;
        wait_for(waits, self.options.timeout())
    }

    fn fail(&mut self, attempts: usize, failure: WaitFailure) -> TransitError {
        self.stage = TransitionStage::Failed;
        self.target.wrap_failure(attempts, failure)
    }
}
