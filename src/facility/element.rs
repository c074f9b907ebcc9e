//! Elements of a facility and the conditions they contribute.

use crate::core::Condition;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A piece of a facility, e.g. a view, that may gate entering or leaving.
pub trait Element: Send + Sync {
    /// Identifier, unique within the facilities of one test.
    fn id(&self) -> &str;

    /// Condition that must hold for the facility to count as entered.
    fn enter_condition(&self) -> Option<Arc<dyn Condition>>;

    /// Condition that must hold for the facility to count as left.
    ///
    /// `persisting` holds the ids of elements that carry over into the
    /// next state; an element in that set contributes nothing.
    fn exit_condition(&self, persisting: &HashSet<String>) -> Option<Arc<dyn Condition>>;
}

/// Element holding fixed, optional enter and exit conditions.
///
/// ```rust
/// use transit::core::FnCondition;
/// use transit::facility::{ConditionalElement, Element};
/// use std::collections::HashSet;
///
/// let button = ConditionalElement::new("ok_button")
///     .with_exit_condition(FnCondition::predicate("OK gone", || true).shared());
///
/// assert!(button.exit_condition(&HashSet::new()).is_some());
/// let persisting: HashSet<String> = ["ok_button".to_string()].into();
/// assert!(button.exit_condition(&persisting).is_none());
/// ```
pub struct ConditionalElement {
    id: String,
    enter: Option<Arc<dyn Condition>>,
    exit: Option<Arc<dyn Condition>>,
}

impl ConditionalElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enter: None,
            exit: None,
        }
    }

    pub fn with_enter_condition(mut self, condition: Arc<dyn Condition>) -> Self {
        self.enter = Some(condition);
        self
    }

    pub fn with_exit_condition(mut self, condition: Arc<dyn Condition>) -> Self {
        self.exit = Some(condition);
        self
    }
}

impl Element for ConditionalElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn enter_condition(&self) -> Option<Arc<dyn Condition>> {
        self.enter.clone()
    }

    fn exit_condition(&self, persisting: &HashSet<String>) -> Option<Arc<dyn Condition>> {
        if persisting.contains(&self.id) {
            return None;
        }
        self.exit.clone()
    }
}

/// Everything a facility declares: its elements in state plus
/// facility-level conditions not tied to a single element.
#[derive(Default)]
pub struct Elements {
    elements_in_state: Vec<Arc<dyn Element>>,
    other_enter_conditions: Vec<Arc<dyn Condition>>,
    other_exit_conditions: Vec<Arc<dyn Condition>>,
}

impl Elements {
    pub fn declare_element(&mut self, element: Arc<dyn Element>) {
        self.elements_in_state.push(element);
    }

    pub fn declare_enter_condition(&mut self, condition: Arc<dyn Condition>) {
        self.other_enter_conditions.push(condition);
    }

    pub fn declare_exit_condition(&mut self, condition: Arc<dyn Condition>) {
        self.other_exit_conditions.push(condition);
    }

    pub fn elements_in_state(&self) -> &[Arc<dyn Element>] {
        &self.elements_in_state
    }

    pub fn other_enter_conditions(&self) -> &[Arc<dyn Condition>] {
        &self.other_enter_conditions
    }

    pub fn other_exit_conditions(&self) -> &[Arc<dyn Condition>] {
        &self.other_exit_conditions
    }

    pub fn is_empty(&self) -> bool {
        self.elements_in_state.is_empty()
            && self.other_enter_conditions.is_empty()
            && self.other_exit_conditions.is_empty()
    }
}

impl fmt::Debug for Elements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.elements_in_state.iter().map(|e| e.id()).collect();
        f.debug_struct("Elements")
            .field("elements_in_state", &ids)
            .field("other_enter_conditions", &self.other_enter_conditions)
            .field("other_exit_conditions", &self.other_exit_conditions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FnCondition;

    #[test]
    fn element_without_conditions_contributes_nothing() {
        let element = ConditionalElement::new("label");
        assert!(element.enter_condition().is_none());
        assert!(element.exit_condition(&HashSet::new()).is_none());
    }

    #[test]
    fn persisting_element_skips_exit_condition() {
        let element = ConditionalElement::new("toolbar")
            .with_exit_condition(FnCondition::predicate("Toolbar gone", || true).shared());

        let persisting: HashSet<String> = ["toolbar".to_string()].into();
        let others: HashSet<String> = ["menu".to_string()].into();

        assert!(element.exit_condition(&persisting).is_none());
        assert!(element.exit_condition(&others).is_some());
    }

    #[test]
    fn elements_collects_declarations() {
        let mut elements = Elements::default();
        assert!(elements.is_empty());

        elements.declare_element(Arc::new(ConditionalElement::new("a")));
        elements.declare_enter_condition(FnCondition::predicate("in", || true).shared());
        elements.declare_exit_condition(FnCondition::predicate("out", || true).shared());

        assert!(!elements.is_empty());
        assert_eq!(elements.elements_in_state().len(), 1);
        assert_eq!(elements.other_enter_conditions().len(), 1);
        assert_eq!(elements.other_exit_conditions()[0].description(), "out");
        assert!(format!("{:?}", elements).contains("\"a\""));
    }
}
