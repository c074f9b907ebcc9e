//! Options controlling a transition's retries and polling budget.

use crate::transition::error::{OptionsViolation, TransitError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Polling budget used when no timeout is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Retry and timeout settings, fixed once a transition starts.
///
/// Serialized with the timeout in milliseconds; missing fields take the
/// defaults (one try, [`DEFAULT_TIMEOUT`]).
///
/// # Example
///
/// ```rust
/// use transit::transition::TransitionOptions;
/// use std::time::Duration;
///
/// let options = TransitionOptions::builder()
///     .tries(3)
///     .timeout(Duration::from_secs(2))
///     .build();
///
/// assert_eq!(options.tries(), 3);
/// assert!(options.validate().is_success());
///
/// let parsed: TransitionOptions = serde_json::from_str(r#"{"tries": 2}"#).unwrap();
/// assert_eq!(parsed.timeout(), Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
    tries: usize,
    #[serde(rename = "timeout_ms", with = "duration_millis")]
    timeout: Duration,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            tries: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransitionOptions {
    pub fn builder() -> TransitionOptionsBuilder {
        TransitionOptionsBuilder::new()
    }

    /// Maximum number of attempts, the first one included.
    pub fn tries(&self) -> usize {
        self.tries
    }

    /// Polling budget of each attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<OptionsViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<OptionsViolation>>> = Vec::new();

        let tries = if self.tries == 0 {
            Validation::fail(OptionsViolation::NoTries)
        } else {
            Validation::success(())
        };
        checks.push(tries);

        let timeout = if self.timeout.is_zero() {
            Validation::fail(OptionsViolation::ZeroTimeout)
        } else {
            Validation::success(())
        };
        checks.push(timeout);

        Validation::all_vec(checks).map(|_| ())
    }

    pub(crate) fn ensure_valid(&self) -> Result<(), TransitError> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(TransitError::InvalidOptions {
                violations: errors.iter().cloned().collect(),
            }),
        }
    }
}

/// Fluent builder for [`TransitionOptions`].
pub struct TransitionOptionsBuilder {
    options: TransitionOptions,
}

impl TransitionOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: TransitionOptions::default(),
        }
    }

    /// Set maximum attempts, the first one included
    pub fn tries(mut self, tries: usize) -> Self {
        self.options.tries = tries;
        self
    }

    /// Set the polling budget of each attempt
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn build(self) -> TransitionOptions {
        self.options
    }
}

impl Default for TransitionOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
