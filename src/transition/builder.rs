//! Builder for constructing transitions.

use crate::config::{AfterTransitionHook, TransitConfig};
use crate::core::Condition;
use crate::facility::Facility;
use crate::transition::{
    FacilityCheckIn, FacilityCheckOut, FacilityTransition, Transition, TransitionOptions,
    TransitionStage, Trigger,
};
use std::sync::Arc;
use uuid::Uuid;

/// Builder for transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use transit::core::FnCondition;
/// use transit::facility::Facility;
/// use transit::transition::{TransitionBuilder, TransitionOptions};
/// use std::time::Duration;
///
/// let mut menu = Facility::active("AppMenu");
/// menu.elements_mut()
///     .declare_exit_condition(FnCondition::predicate("Menu gone", || true).shared());
///
/// let report = TransitionBuilder::new()
///     .options(TransitionOptions::builder().tries(2).timeout(Duration::from_secs(1)).build())
///     .trigger(|| { /* press back */ })
///     .check_out(&mut menu)
///     .execute()
///     .unwrap();
///
/// assert_eq!(report.attempts, 1);
/// ```
pub struct TransitionBuilder {
    options: TransitionOptions,
    trigger: Option<Trigger>,
    conditions: Vec<Arc<dyn Condition>>,
    after_hook: Box<dyn AfterTransitionHook>,
}

impl TransitionBuilder {
    /// Create a builder with default options, no trigger, and the
    /// post-transition hook configured by the process environment (see
    /// [`TransitConfig::from_env_or_default`]).
    pub fn new() -> Self {
        Self {
            options: TransitionOptions::default(),
            trigger: None,
            conditions: Vec::new(),
            after_hook: Box::new(TransitConfig::from_env_or_default()),
        }
    }

    pub fn options(mut self, options: TransitionOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the action fired on every try (optional). Without one, the
    /// transition waits for changes already in motion.
    pub fn trigger<F>(mut self, trigger: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.trigger = Some(Box::new(trigger));
        self
    }

    /// Add a condition that must hold for the transition itself.
    pub fn require(mut self, condition: Arc<dyn Condition>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Replace the post-transition hook.
    pub fn after_transition<H>(mut self, hook: H) -> Self
    where
        H: AfterTransitionHook + 'static,
    {
        self.after_hook = Box::new(hook);
        self
    }

    /// Build a transition entering `facility`.
    pub fn check_in(self, facility: &mut Facility) -> Transition<'_> {
        self.build(FacilityTransition::CheckIn(FacilityCheckIn::new(facility)))
    }

    /// Build a transition leaving `facility`.
    pub fn check_out(self, facility: &mut Facility) -> Transition<'_> {
        self.build(FacilityTransition::CheckOut(FacilityCheckOut::new(facility)))
    }

    fn build(self, target: FacilityTransition<'_>) -> Transition<'_> {
        Transition {
            id: Uuid::new_v4(),
            target,
            options: self.options,
            trigger: self.trigger,
            transition_conditions: self.conditions,
            after_hook: self.after_hook,
            stage: TransitionStage::NotStarted,
        }
    }
}

impl Default for TransitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
