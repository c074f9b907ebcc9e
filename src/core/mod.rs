//! Core value types of the transition engine.
//!
//! This module contains the leaves everything else is built on:
//! - [`ConditionStatus`]: the immutable result of one condition check
//! - [`Condition`]: the capability the waiter samples
//! - [`FacilityPhase`] and [`PhaseHistory`]: facility lifecycle tracking
//!
//! Nothing here blocks or sleeps.

mod condition;
mod history;
mod phase;
mod status;

pub use condition::{Condition, FnCondition};
pub use history::{PhaseChange, PhaseHistory};
pub use phase::FacilityPhase;
pub use status::{ConditionStatus, ConditionStatusBuilder, Status, MAX_MESSAGE_CHARS};
