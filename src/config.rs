//! Process-level configuration and the post-transition hook.
//!
//! [`TransitConfig`] can be loaded from JSON or from the environment. It
//! is also the default [`AfterTransitionHook`]: transitions built without
//! an explicit hook read [`PAUSE_AFTER_TRANSITION_VAR`] from the process
//! environment, and with no pause configured the hook does nothing.

use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable holding the pause after each transition, in ms.
pub const PAUSE_AFTER_TRANSITION_VAR: &str = "TRANSIT_PAUSE_AFTER_TRANSITION_MS";

/// Errors raised while loading a [`TransitConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: expected milliseconds")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Called once after a transition fully succeeds. Must not affect the
/// transition's outcome.
pub trait AfterTransitionHook {
    fn after_transition(&self, subject: &str);
}

/// Environment-specific knobs.
///
/// # Example
///
/// ```rust
/// use transit::config::TransitConfig;
/// use std::time::Duration;
///
/// let config = TransitConfig::from_json(r#"{"pause_after_transition_ms": 1500}"#).unwrap();
/// assert_eq!(config.pause_after_transition(), Some(Duration::from_millis(1500)));
/// assert_eq!(TransitConfig::default().pause_after_transition(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    pause_after_transition_ms: Option<u64>,
}

impl TransitConfig {
    pub fn with_pause_after_transition(pause: Duration) -> Self {
        Self {
            pause_after_transition_ms: Some(u64::try_from(pause.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Pause inserted after every successful transition, for manual
    /// inspection of the UI.
    pub fn pause_after_transition(&self) -> Option<Duration> {
        self.pause_after_transition_ms.map(Duration::from_millis)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from the process environment. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), but an invalid value is logged
    /// and replaced by the defaults.
    pub fn from_env_or_default() -> Self {
        Self::from_lookup_or_default(|var| std::env::var(var).ok())
    }

    pub fn from_lookup_or_default<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(lookup).unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring transit configuration from environment");
            Self::default()
        })
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(PAUSE_AFTER_TRANSITION_VAR) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: PAUSE_AFTER_TRANSITION_VAR.to_string(),
                    value: value.clone(),
                })?;
            config.pause_after_transition_ms = Some(millis);
        }
        Ok(config)
    }
}

impl AfterTransitionHook for TransitConfig {
    fn after_transition(&self, subject: &str) {
        if let Some(pause) = self.pause_after_transition() {
            info!(subject, pause = ?pause, "Pausing after transition");
            thread::sleep(pause);
        }
    }
}
