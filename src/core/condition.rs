//! Conditions sampled by the waiter.
//!
//! A condition is a repeatedly-evaluable predicate with three outcomes:
//! not yet true, true, or an unrecoverable error. The engine never looks
//! inside a condition, it only reads the [`ConditionStatus`] it returns.

use super::status::ConditionStatus;
use std::fmt;
use std::sync::Arc;

/// Polymorphic unit checked on every polling pass.
///
/// Implementations must be cheap to call repeatedly and must encode
/// expected negative outcomes as `NotFulfilled`, never as a panic.
///
/// # Example
///
/// ```rust
/// use transit::core::{Condition, ConditionStatus};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct ViewGone {
///     attached: AtomicBool,
/// }
///
/// impl Condition for ViewGone {
///     fn description(&self) -> String {
///         "View gone".to_string()
///     }
///
///     fn check(&self) -> ConditionStatus {
///         ConditionStatus::whether(!self.attached.load(Ordering::SeqCst))
///     }
/// }
///
/// let condition = ViewGone { attached: AtomicBool::new(false) };
/// assert!(condition.check().is_fulfilled());
/// ```
pub trait Condition: Send + Sync {
    /// Short name used in logs and failure reports.
    fn description(&self) -> String;

    /// Evaluate the condition once.
    fn check(&self) -> ConditionStatus;
}

impl fmt::Debug for dyn Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.description()).finish()
    }
}

/// Condition backed by a closure.
///
/// ```rust
/// use transit::core::{Condition, FnCondition};
///
/// let always = FnCondition::predicate("always", || true);
/// assert!(always.check().is_fulfilled());
/// ```
pub struct FnCondition {
    description: String,
    check: Box<dyn Fn() -> ConditionStatus + Send + Sync>,
}

impl FnCondition {
    /// Create a condition from a closure producing a full status.
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> ConditionStatus + Send + Sync + 'static,
    {
        FnCondition {
            description: description.into(),
            check: Box::new(check),
        }
    }

    /// Create a condition from a boolean predicate. `false` maps to
    /// `NotFulfilled`; a predicate can never report an error.
    pub fn predicate<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::new(description, move || ConditionStatus::whether(predicate()))
    }

    /// Wrap into the shared handle that waits hold.
    pub fn shared(self) -> Arc<dyn Condition> {
        Arc::new(self)
    }
}

impl Condition for FnCondition {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn check(&self) -> ConditionStatus {
        (self.check)()
    }
}
