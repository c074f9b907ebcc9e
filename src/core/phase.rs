//! Lifecycle phases of a facility.
//!
//! A facility moves forward only:
//! `New -> TransitioningTo -> Active -> TransitioningFrom -> Finished`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a [`Facility`](crate::facility::Facility).
///
/// # Example
///
/// ```rust
/// use transit::core::FacilityPhase;
///
/// assert!(FacilityPhase::Active.can_advance_to(FacilityPhase::TransitioningFrom));
/// assert!(!FacilityPhase::Active.can_advance_to(FacilityPhase::Finished));
/// assert!(FacilityPhase::Finished.is_final());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityPhase {
    /// Declared but never entered.
    New,
    /// An entry transition is in flight.
    TransitioningTo,
    /// Entered and not yet being left.
    Active,
    /// An exit transition is in flight.
    TransitioningFrom,
    /// Left for good.
    Finished,
}

impl FacilityPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::TransitioningTo => "TransitioningTo",
            Self::Active => "Active",
            Self::TransitioningFrom => "TransitioningFrom",
            Self::Finished => "Finished",
        }
    }

    /// No transition leaves this phase.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// A transition is currently in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::TransitioningTo | Self::TransitioningFrom)
    }

    /// The single phase that may follow this one.
    pub fn next(&self) -> Option<FacilityPhase> {
        match self {
            Self::New => Some(Self::TransitioningTo),
            Self::TransitioningTo => Some(Self::Active),
            Self::Active => Some(Self::TransitioningFrom),
            Self::TransitioningFrom => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    pub fn can_advance_to(&self, to: FacilityPhase) -> bool {
        self.next() == Some(to)
    }
}

impl fmt::Display for FacilityPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
