//! Conditions tagged with their role in a transition.

use crate::core::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Role of a condition in a transition. Orders report rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOrigin {
    /// Taken on entering a facility.
    Enter,
    /// Taken on leaving a facility.
    Exit,
    /// Required by the transition itself.
    Transition,
}

impl fmt::Display for ConditionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "ENTER",
            Self::Exit => "EXIT",
            Self::Transition => "TRANSITION",
        })
    }
}

/// A condition bound to its origin for one transition attempt.
#[derive(Clone, Debug)]
pub struct ConditionWait {
    condition: Arc<dyn Condition>,
    origin: ConditionOrigin,
}

impl ConditionWait {
    pub fn new(condition: Arc<dyn Condition>, origin: ConditionOrigin) -> Self {
        Self { condition, origin }
    }

    pub fn condition(&self) -> &Arc<dyn Condition> {
        &self.condition
    }

    pub fn origin(&self) -> ConditionOrigin {
        self.origin
    }
}
