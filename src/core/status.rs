//! Result of a single condition check.
//!
//! A [`ConditionStatus`] is an immutable value: status code, optional
//! message and the time the check happened. Messages are capped at
//! [`MAX_MESSAGE_CHARS`] characters when the value is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on the length of a status message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 300;

const AMEND_SEPARATOR: &str = "  ";

/// Outcome of one evaluation of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The condition does not hold yet.
    NotFulfilled,
    /// The condition holds.
    Fulfilled,
    /// The condition can no longer be fulfilled.
    Error,
}

impl Status {
    /// Fixed label used in gate rendering.
    pub fn gate_label(&self) -> &'static str {
        match self {
            Self::Fulfilled => "REQUIRED",
            Self::NotFulfilled => "NOT REQ",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFulfilled => "NOT_FULFILLED",
            Self::Fulfilled => "FULFILLED",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Immutable result of [`Condition::check`](crate::core::Condition::check).
///
/// # Example
///
/// ```rust
/// use transit::core::ConditionStatus;
///
/// let status = ConditionStatus::not_fulfilled_with("view not attached");
/// assert!(!status.is_fulfilled());
/// assert!(!status.is_error());
/// assert_eq!(status.as_gate_message(), "NOT REQ | view not attached");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConditionStatus {
    status: Status,
    message: Option<String>,
    timestamp: DateTime<Utc>,
}

impl ConditionStatus {
    /// Start building a status. The message can be set and amended
    /// before the value is frozen by [`ConditionStatusBuilder::build`].
    pub fn builder(status: Status) -> ConditionStatusBuilder {
        ConditionStatusBuilder {
            status,
            message: None,
            timestamp: None,
        }
    }

    pub fn fulfilled() -> Self {
        Self::builder(Status::Fulfilled).build()
    }

    pub fn fulfilled_with(message: impl Into<String>) -> Self {
        Self::builder(Status::Fulfilled).message(message).build()
    }

    pub fn not_fulfilled() -> Self {
        Self::builder(Status::NotFulfilled).build()
    }

    pub fn not_fulfilled_with(message: impl Into<String>) -> Self {
        Self::builder(Status::NotFulfilled).message(message).build()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::builder(Status::Error).message(message).build()
    }

    /// `Fulfilled` if `condition` is true, `NotFulfilled` otherwise.
    pub fn whether(condition: bool) -> Self {
        Self::builder(Self::status_for(condition)).build()
    }

    pub fn whether_with(condition: bool, message: impl Into<String>) -> Self {
        Self::builder(Self::status_for(condition))
            .message(message)
            .build()
    }

    fn status_for(condition: bool) -> Status {
        if condition {
            Status::Fulfilled
        } else {
            Status::NotFulfilled
        }
    }

    /// Reopen this status for amendment.
    ///
    /// The rebuilt value keeps this status code and timestamp.
    pub fn into_builder(self) -> ConditionStatusBuilder {
        ConditionStatusBuilder {
            status: self.status,
            message: self.message,
            timestamp: Some(self.timestamp),
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == Status::Fulfilled
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Human-readable gate form, for logs and failure reports only.
    ///
    /// ```rust
    /// use transit::core::ConditionStatus;
    ///
    /// assert_eq!(ConditionStatus::fulfilled().as_gate_message(), "REQUIRED");
    /// assert_eq!(ConditionStatus::error("gone").as_gate_message(), "ERROR | gone");
    /// ```
    pub fn as_gate_message(&self) -> String {
        match &self.message {
            Some(message) => format!("{} | {}", self.status.gate_label(), message),
            None => self.status.gate_label().to_string(),
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_gate_message())
    }
}

/// Mutable staging area for a [`ConditionStatus`].
#[derive(Clone, Debug)]
pub struct ConditionStatusBuilder {
    status: Status,
    message: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl ConditionStatusBuilder {
    /// Replace the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Append a secondary note, separated by two spaces from any
    /// existing message.
    pub fn amend(mut self, note: impl AsRef<str>) -> Self {
        let note = note.as_ref();
        self.message = Some(match self.message.take() {
            Some(existing) => format!("{existing}{AMEND_SEPARATOR}{note}"),
            None => note.to_string(),
        });
        self
    }

    /// Freeze the status, truncating the message to the hard cap.
    pub fn build(self) -> ConditionStatus {
        ConditionStatus {
            status: self.status,
            message: self.message.map(truncate),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

fn truncate(message: String) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => message[..cut].to_string(),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_follow_status() {
        let fulfilled = ConditionStatus::fulfilled();
        assert!(fulfilled.is_fulfilled());
        assert!(!fulfilled.is_error());

        let pending = ConditionStatus::not_fulfilled();
        assert!(!pending.is_fulfilled());
        assert!(!pending.is_error());

        let error = ConditionStatus::error("broken");
        assert!(!error.is_fulfilled());
        assert!(error.is_error());
    }

    #[test]
    fn whether_maps_booleans() {
        assert_eq!(ConditionStatus::whether(true).status(), Status::Fulfilled);
        assert_eq!(
            ConditionStatus::whether(false).status(),
            Status::NotFulfilled
        );
        assert_eq!(
            ConditionStatus::whether_with(false, "hidden").message(),
            Some("hidden")
        );
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 50);
        let status = ConditionStatus::not_fulfilled_with(long.clone());
        assert_eq!(status.message(), Some(&long[..MAX_MESSAGE_CHARS]));
    }

    #[test]
    fn short_messages_are_kept() {
        let exact = "y".repeat(MAX_MESSAGE_CHARS);
        let status = ConditionStatus::fulfilled_with(exact.clone());
        assert_eq!(status.message(), Some(exact.as_str()));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "é".repeat(MAX_MESSAGE_CHARS + 1);
        let status = ConditionStatus::error(long);
        let message = status.message().unwrap();
        assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn amend_appends_with_two_spaces() {
        let status = ConditionStatus::not_fulfilled_with("A")
            .into_builder()
            .amend("B")
            .build();
        assert_eq!(status.message(), Some("A  B"));
    }

    #[test]
    fn amend_without_message_sets_it() {
        let status = ConditionStatus::not_fulfilled()
            .into_builder()
            .amend("B")
            .build();
        assert_eq!(status.message(), Some("B"));
    }

    #[test]
    fn amend_keeps_status_and_timestamp() {
        let original = ConditionStatus::error("first");
        let amended = original.clone().into_builder().amend("second").build();
        assert_eq!(amended.status(), original.status());
        assert_eq!(amended.timestamp(), original.timestamp());
    }

    #[test]
    fn gate_rendering_uses_fixed_labels() {
        assert_eq!(ConditionStatus::fulfilled().as_gate_message(), "REQUIRED");
        assert_eq!(ConditionStatus::not_fulfilled().as_gate_message(), "NOT REQ");
        assert_eq!(
            ConditionStatus::fulfilled_with("ok").as_gate_message(),
            "REQUIRED | ok"
        );
        assert_eq!(
            ConditionStatus::not_fulfilled_with("waiting").as_gate_message(),
            "NOT REQ | waiting"
        );
        assert_eq!(
            ConditionStatus::error("gone").as_gate_message(),
            "ERROR | gone"
        );
    }

    #[test]
    fn status_serializes_with_screaming_names() {
        let json = serde_json::to_value(ConditionStatus::not_fulfilled_with("m")).unwrap();
        assert_eq!(json["status"], "NOT_FULFILLED");
        assert_eq!(json["message"], "m");
    }
}
