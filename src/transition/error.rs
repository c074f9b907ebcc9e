//! Transition errors.

use crate::facility::PhaseError;
use crate::waiter::WaitFailure;
use thiserror::Error;

/// Rules a [`TransitionOptions`](super::TransitionOptions) must satisfy
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptionsViolation {
    #[error("tries must be at least 1")]
    NoTries,

    #[error("timeout must be non-zero")]
    ZeroTimeout,
}

/// Errors surfaced by [`Transition::execute`](super::Transition::execute)
#[derive(Debug, Error)]
pub enum TransitError {
    #[error("Failed to exit {facility} after {attempts} tries: {source}")]
    ExitFacility {
        facility: String,
        attempts: usize,
        source: WaitFailure,
    },

    #[error("Failed to enter {facility} after {attempts} tries: {source}")]
    EnterFacility {
        facility: String,
        attempts: usize,
        source: WaitFailure,
    },

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("Invalid transition options: {}", join(.violations))]
    InvalidOptions { violations: Vec<OptionsViolation> },

    #[error("Transition {subject} was already executed")]
    AlreadyExecuted { subject: String },
}

impl TransitError {
    /// The wait failure of the last try, if the transition timed out or
    /// a condition errored.
    pub fn wait_failure(&self) -> Option<&WaitFailure> {
        match self {
            Self::ExitFacility { source, .. } | Self::EnterFacility { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Number of tries made before giving up.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            Self::ExitFacility { attempts, .. } | Self::EnterFacility { attempts, .. } => {
                Some(*attempts)
            }
            _ => None,
        }
    }
}

fn join(violations: &[OptionsViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
