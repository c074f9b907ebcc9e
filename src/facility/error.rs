//! Facility lifecycle errors.

use crate::core::FacilityPhase;
use thiserror::Error;

/// Errors raised by the facility lifecycle markers
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PhaseError {
    #[error("Facility '{facility}' cannot move from {from} to {to}")]
    InvalidPhase {
        facility: String,
        from: FacilityPhase,
        to: FacilityPhase,
    },
}
