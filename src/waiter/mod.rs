//! Polling loop that waits for a set of conditions.
//!
//! The waiter samples every condition once per pass, sequentially, and
//! sleeps [`POLLING_INTERVAL`] between passes. It stops when:
//! - every condition is fulfilled on the same pass (success),
//! - any condition reports `Error` (failure, without waiting out the deadline),
//! - the deadline computed at wait start elapses (failure). A timeout too
//!   large to add to the start instant, such as `Duration::MAX`, has no deadline.
//!
//! Failures carry a [`WaitTable`] with the last status of every wait.
//!
//! # Example
//!
//! ```rust
//! use transit::core::FnCondition;
//! use transit::waiter::{wait_for, ConditionOrigin, ConditionWait};
//! use std::time::Duration;
//!
//! let waits = vec![ConditionWait::new(
//!     FnCondition::predicate("always", || true).shared(),
//!     ConditionOrigin::Transition,
//! )];
//!
//! let report = wait_for(&waits, Duration::from_secs(1)).unwrap();
//! assert_eq!(report.passes, 1);
//! ```

mod error;
mod report;
mod wait;

pub use error::{FailureReason, WaitFailure};
pub use report::{WaitReport, WaitStatusRow, WaitTable};
pub use wait::{ConditionOrigin, ConditionWait};

use crate::core::ConditionStatus;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Pause between two polling passes.
pub const POLLING_INTERVAL: Duration = Duration::from_millis(50);

/// Waits until an ordered set of conditions is fulfilled.
pub struct ConditionWaiter<'w> {
    waits: &'w [ConditionWait],
    timeout: Duration,
}

impl<'w> ConditionWaiter<'w> {
    pub fn new(waits: &'w [ConditionWait], timeout: Duration) -> Self {
        Self { waits, timeout }
    }

    /// Block until all conditions hold on one pass, one errors, or the
    /// timeout elapses. At least one pass always runs.
    pub fn wait(&self) -> Result<WaitReport, WaitFailure> {
        let start = Instant::now();
        // `None` when the timeout is too large to represent; polling is unbounded.
        let deadline = start.checked_add(self.timeout);
        let mut progress: Vec<WaitProgress> = Vec::with_capacity(self.waits.len());
        let mut passes = 0;

        debug!(conditions = self.waits.len(), timeout = ?self.timeout, "Waiting for conditions");

        loop {
            passes += 1;
            let mut all_fulfilled = true;
            let mut errored: Option<String> = None;

            for (index, wait) in self.waits.iter().enumerate() {
                let status = wait.condition().check();
                let elapsed = start.elapsed();
                match progress.get_mut(index) {
                    Some(tracker) => tracker.observe(wait, status, elapsed),
                    None => progress.push(WaitProgress::first(wait, status, elapsed)),
                }

                let status = &progress[index].last;
                all_fulfilled &= status.is_fulfilled();
                if status.is_error() && errored.is_none() {
                    errored = Some(wait.condition().description());
                }
            }

            if let Some(condition) = errored {
                return Err(self.failure(
                    FailureReason::ConditionError { condition },
                    start,
                    passes,
                    progress,
                ));
            }

            if all_fulfilled {
                debug!(passes, elapsed = ?start.elapsed(), "All conditions fulfilled");
                return Ok(WaitReport {
                    elapsed: start.elapsed(),
                    passes,
                    table: self.table(progress),
                });
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    return Err(self.failure(
                        FailureReason::Timeout {
                            timeout: self.timeout,
                        },
                        start,
                        passes,
                        progress,
                    ));
                }
                Some(deadline) => POLLING_INTERVAL.min(deadline - now),
                None => POLLING_INTERVAL,
            };
            thread::sleep(pause);
        }
    }

    fn failure(
        &self,
        reason: FailureReason,
        start: Instant,
        passes: usize,
        progress: Vec<WaitProgress>,
    ) -> WaitFailure {
        WaitFailure {
            reason,
            elapsed: start.elapsed(),
            passes,
            table: self.table(progress),
        }
    }

    fn table(&self, progress: Vec<WaitProgress>) -> WaitTable {
        let rows = self
            .waits
            .iter()
            .zip(progress)
            .map(|(wait, progress)| WaitStatusRow {
                origin: wait.origin(),
                condition: wait.condition().description(),
                status: progress.last,
                checks: progress.checks,
                first_fulfilled_after: progress.first_fulfilled_after,
                regressions: progress.regressions,
            })
            .collect();
        WaitTable::new(rows)
    }
}

/// Shorthand for `ConditionWaiter::new(waits, timeout).wait()`.
pub fn wait_for(waits: &[ConditionWait], timeout: Duration) -> Result<WaitReport, WaitFailure> {
    ConditionWaiter::new(waits, timeout).wait()
}

/// Everything observed about one wait so far. Created on its first check.
#[derive(Debug)]
struct WaitProgress {
    last: ConditionStatus,
    checks: usize,
    first_fulfilled_after: Option<Duration>,
    regressions: usize,
}

impl WaitProgress {
    fn first(wait: &ConditionWait, status: ConditionStatus, elapsed: Duration) -> Self {
        log_status(wait, &status, elapsed);
        Self {
            first_fulfilled_after: status.is_fulfilled().then_some(elapsed),
            last: status,
            checks: 1,
            regressions: 0,
        }
    }

    fn observe(&mut self, wait: &ConditionWait, status: ConditionStatus, elapsed: Duration) {
        self.checks += 1;

        let status = if self.last.is_fulfilled() && !status.is_fulfilled() {
            self.regressions += 1;
            status
                .into_builder()
                .amend(format!("(regressed, {} regressions)", self.regressions))
                .build()
        } else {
            status
        };

        if status.is_fulfilled() && self.first_fulfilled_after.is_none() {
            self.first_fulfilled_after = Some(elapsed);
        }

        if self.last.status() != status.status() || self.last.message() != status.message() {
            log_status(wait, &status, elapsed);
        }
        self.last = status;
    }
}

fn log_status(wait: &ConditionWait, status: &ConditionStatus, elapsed: Duration) {
    debug!(
        origin = %wait.origin(),
        condition = %wait.condition().description(),
        status = %status.as_gate_message(),
        elapsed = ?elapsed,
        "Condition status changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, FnCondition, Status};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Returns scripted statuses in order, repeating the last one.
    struct Scripted {
        name: &'static str,
        script: Mutex<VecDeque<Status>>,
    }

    impl Scripted {
        fn new(name: &'static str, script: &[Status]) -> Arc<dyn Condition> {
            Arc::new(Self {
                name,
                script: Mutex::new(script.iter().copied().collect()),
            })
        }
    }

    impl Condition for Scripted {
        fn description(&self) -> String {
            self.name.to_string()
        }

        fn check(&self) -> ConditionStatus {
            let mut script = self.script.lock().unwrap();
            let status = if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script[0]
            };
            ConditionStatus::builder(status).build()
        }
    }

    use crate::core::Status::{Error as E, Fulfilled as F, NotFulfilled as N};

    fn exit_wait(condition: Arc<dyn Condition>) -> ConditionWait {
        ConditionWait::new(condition, ConditionOrigin::Exit)
    }

    #[test]
    fn empty_wait_set_succeeds_immediately() {
        let report = wait_for(&[], Duration::from_millis(100)).unwrap();
        assert_eq!(report.passes, 1);
        assert!(report.table.is_empty());
    }

    #[test]
    fn succeeds_when_all_fulfilled_on_later_pass() {
        let waits = vec![
            exit_wait(Scripted::new("a", &[F])),
            exit_wait(Scripted::new("b", &[N, F])),
        ];

        let report = wait_for(&waits, Duration::from_secs(2)).unwrap();

        assert_eq!(report.passes, 2);
        assert!(report.table.rows().iter().all(WaitStatusRow::is_fulfilled));
        assert_eq!(report.table.find("a").unwrap().checks, 2);
    }

    #[test]
    fn regression_on_same_pass_prevents_success() {
        let waits = vec![
            exit_wait(Scripted::new("a", &[F, N])),
            exit_wait(Scripted::new("b", &[N, F])),
        ];

        let failure = wait_for(&waits, Duration::from_millis(200)).unwrap_err();

        assert!(failure.is_timeout());
        assert!(failure.passes >= 2);
        let a = failure.table.find("a").unwrap();
        assert!(!a.is_fulfilled());
        assert_eq!(a.regressions, 1);
        assert!(failure.table.find("b").unwrap().is_fulfilled());
    }

    #[test]
    fn regressed_status_is_amended() {
        let waits = vec![
            exit_wait(Scripted::new("flaky", &[F, E])),
            exit_wait(Scripted::new("pending", &[N])),
        ];
        let failure = wait_for(&waits, Duration::from_secs(2)).unwrap_err();

        assert_eq!(failure.passes, 2);
        assert_eq!(
            failure.reason,
            FailureReason::ConditionError {
                condition: "flaky".to_string()
            }
        );
        let row = failure.table.find("flaky").unwrap();
        let status = &row.status;
        assert!(status.is_error());
        assert_eq!(status.message(), Some("(regressed, 1 regressions)"));
        assert_eq!(row.regressions, 1);
    }

    #[test]
    fn error_stops_polling_before_deadline() {
        let waits = vec![
            exit_wait(Scripted::new("pending", &[N])),
            exit_wait(Scripted::new("broken", &[N, E])),
        ];

        let started = Instant::now();
        let failure = wait_for(&waits, Duration::from_secs(10)).unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(failure.passes, 2);
        assert_eq!(
            failure.reason,
            FailureReason::ConditionError {
                condition: "broken".to_string()
            }
        );
    }

    #[test]
    fn timeout_reports_every_wait() {
        let waits = vec![
            exit_wait(Scripted::new("done", &[F])),
            ConditionWait::new(Scripted::new("never", &[N]), ConditionOrigin::Transition),
        ];

        let failure = wait_for(&waits, Duration::from_millis(100)).unwrap_err();
        let rendered = failure.to_string();

        assert!(failure.is_timeout());
        assert_eq!(failure.table.len(), 2);
        assert!(failure.elapsed >= Duration::from_millis(100));
        assert!(rendered.contains("[EXIT] done: <Gate: REQUIRED>"));
        assert!(rendered.contains("[TRANSITION] never: <Gate: NOT REQ>"));
    }

    #[test]
    fn zero_timeout_still_runs_one_pass() {
        let waits = vec![exit_wait(FnCondition::predicate("yes", || true).shared())];
        let report = wait_for(&waits, Duration::ZERO).unwrap();
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn unbounded_timeout_polls_without_deadline() {
        let waits = vec![
            exit_wait(FnCondition::predicate("ready", || true).shared()),
            exit_wait(Scripted::new("late", &[N, F])),
        ];

        let report = wait_for(&waits, Duration::MAX).unwrap();

        assert_eq!(report.passes, 2);
        assert!(report.table.rows().iter().all(WaitStatusRow::is_fulfilled));
    }

    #[test]
    fn unbounded_timeout_still_fails_fast_on_error() {
        let waits = vec![exit_wait(Scripted::new("broken", &[E]))];
        let failure = wait_for(&waits, Duration::MAX).unwrap_err();
        assert!(failure.is_condition_error());
        assert_eq!(failure.passes, 1);
    }

    #[test]
    fn first_fulfilled_time_is_recorded() {
        let waits = vec![exit_wait(Scripted::new("late", &[N, N, F]))];
        let report = wait_for(&waits, Duration::from_secs(2)).unwrap();

        let row = report.table.find("late").unwrap();
        assert_eq!(row.checks, 3);
        assert!(row.first_fulfilled_after.unwrap() >= POLLING_INTERVAL * 2);
    }
}
