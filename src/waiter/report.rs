//! Per-wait status tables for reports and failures.

use super::wait::ConditionOrigin;
use crate::core::ConditionStatus;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Final known state of one wait.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaitStatusRow {
    pub origin: ConditionOrigin,
    pub condition: String,
    /// Last status seen. Every wait is checked at least once.
    pub status: ConditionStatus,
    pub checks: usize,
    /// Time from wait start to the first fulfilled check.
    pub first_fulfilled_after: Option<Duration>,
    /// How many times the condition went from fulfilled back to not.
    pub regressions: usize,
}

impl WaitStatusRow {
    pub fn is_fulfilled(&self) -> bool {
        self.status.is_fulfilled()
    }
}

impl fmt::Display for WaitStatusRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: <Gate: {}> ({} checks",
            self.origin,
            self.condition,
            self.status.as_gate_message(),
            self.checks
        )?;
        if self.regressions > 0 {
            write!(f, ", {} regressions", self.regressions)?;
        }
        f.write_str(")")
    }
}

/// Status rows ordered by origin, stable within an origin.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WaitTable(Vec<WaitStatusRow>);

impl WaitTable {
    pub(crate) fn new(mut rows: Vec<WaitStatusRow>) -> Self {
        rows.sort_by_key(|row| row.origin);
        Self(rows)
    }

    pub fn rows(&self) -> &[WaitStatusRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First row whose condition matches `condition`.
    pub fn find(&self, condition: &str) -> Option<&WaitStatusRow> {
        self.0.iter().find(|row| row.condition == condition)
    }
}

impl fmt::Display for WaitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("    (no conditions)");
        }
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "    {row}")?;
        }
        Ok(())
    }
}

/// Successful wait.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaitReport {
    pub elapsed: Duration,
    pub passes: usize,
    pub table: WaitTable,
}
