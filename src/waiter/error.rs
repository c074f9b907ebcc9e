//! Wait failures.

use super::report::WaitTable;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a wait stopped without every condition being fulfilled.
#[derive(Clone, Debug, PartialEq)]
pub enum FailureReason {
    /// The deadline elapsed before all conditions held on one pass.
    Timeout { timeout: Duration },
    /// A condition reported `Error`; polling stopped at once.
    ConditionError { condition: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { timeout } => write!(f, "Did not meet all conditions within {timeout:?}"),
            Self::ConditionError { condition } => {
                write!(f, "Condition '{condition}' reported an error")
            }
        }
    }
}

/// Failure of one wait, carrying the last status of every wait.
#[derive(Clone, Debug, Error)]
#[error("{reason} (elapsed {elapsed:?}, {passes} passes)\n{table}")]
pub struct WaitFailure {
    pub reason: FailureReason,
    pub elapsed: Duration,
    pub passes: usize,
    pub table: WaitTable,
}

impl WaitFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self.reason, FailureReason::Timeout { .. })
    }

    pub fn is_condition_error(&self) -> bool {
        matches!(self.reason, FailureReason::ConditionError { .. })
    }
}
