//! Transit: a condition-driven transition engine for UI tests
//!
//! Transit drives a test actor through a state change, such as leaving a
//! screen region, by firing a trigger and then sampling a set of
//! conditions until they all hold on the same polling pass. The whole
//! trigger+wait cycle is retried a bounded number of times.
//!
//! # Core Concepts
//!
//! - **Condition**: a repeatedly-checked predicate returning a `ConditionStatus`
//! - **Wait**: a condition tagged with its role (enter, exit, transition)
//! - **Facility**: a UI region whose lifecycle transitions mark
//! - **Transition**: trigger, wait, retry; reported as one outcome
//!
//! # Example
//!
//! ```rust
//! use transit::core::FnCondition;
//! use transit::facility::Facility;
//! use transit::transition::{TransitionBuilder, TransitionOptions};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let shown = Arc::new(AtomicBool::new(true));
//! let observed = Arc::clone(&shown);
//!
//! let mut menu = Facility::active("AppMenu");
//! menu.elements_mut().declare_exit_condition(
//!     FnCondition::predicate("Menu gone", move || !observed.load(Ordering::SeqCst)).shared(),
//! );
//!
//! let report = TransitionBuilder::new()
//!     .options(TransitionOptions::builder().tries(2).timeout(Duration::from_secs(1)).build())
//!     .trigger(move || shown.store(false, Ordering::SeqCst))
//!     .check_out(&mut menu)
//!     .execute()
//!     .unwrap();
//!
//! assert_eq!(report.attempts, 1);
//! ```

pub mod config;
pub mod core;
pub mod facility;
pub mod transition;
pub mod waiter;

// Re-export commonly used types
pub use config::{AfterTransitionHook, TransitConfig};
pub use crate::core::{Condition, ConditionStatus, FacilityPhase, FnCondition, Status};
pub use facility::{ConditionalElement, Element, Facility};
pub use transition::{TransitError, Transition, TransitionBuilder, TransitionOptions};
pub use waiter::{ConditionOrigin, ConditionWait, ConditionWaiter, WaitFailure};
