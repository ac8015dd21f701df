//! Retry state machine for a single save
//!
//! `Idle → Attempting → {Succeeded | Retrying → Attempting | Failed}`
//!
//! The machine only decides; it never sleeps or performs I/O. The service
//! feeds it each transport outcome and acts on the returned [`Step`], which
//! keeps the retry schedule testable without timers.

use std::time::Duration;

use wikisave_domain::constants::{BASE_BACKOFF, MAX_BACKOFF};
use wikisave_domain::{ClassifiedError, TransportOutcome};

use super::classifier::classify_outcome;

/// Delay before retry number `retry_count + 1`:
/// `min(1000 ms × 2^retry_count, 10 s)`.
pub fn backoff_delay(retry_count: u32) -> Duration {
    let multiplier = 1u32 << retry_count.min(16);
    BASE_BACKOFF.saturating_mul(multiplier).min(MAX_BACKOFF)
}

/// Where a save currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Attempting { retry_count: u32 },
    Retrying { retry_count: u32, delay: Duration },
    Succeeded,
    Failed,
}

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Succeeded,
    /// Sleep for `delay`, then call [`SaveStateMachine::resume`].
    Retry { delay: Duration, error: ClassifiedError },
    Failed(ClassifiedError),
}

/// Bounded retry loop state for one save invocation.
#[derive(Debug, Clone)]
pub struct SaveStateMachine {
    max_retries: u32,
    retry_count: u32,
    state: SaveState,
}

impl SaveStateMachine {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries, retry_count: 0, state: SaveState::Idle }
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SaveState::Succeeded | SaveState::Failed)
    }

    /// Enter the first attempt; returns its retry count (always 0).
    pub fn start(&mut self) -> u32 {
        self.retry_count = 0;
        self.state = SaveState::Attempting { retry_count: 0 };
        0
    }

    /// Record the outcome of the attempt in flight.
    pub fn advance(&mut self, outcome: &TransportOutcome) -> Step {
        let Some(error) = classify_outcome(outcome) else {
            self.state = SaveState::Succeeded;
            return Step::Succeeded;
        };

        if error.retry_eligible && self.retry_count < self.max_retries {
            let delay = backoff_delay(self.retry_count);
            self.state = SaveState::Retrying { retry_count: self.retry_count, delay };
            Step::Retry { delay, error }
        } else {
            self.state = SaveState::Failed;
            Step::Failed(error)
        }
    }

    /// Leave `Retrying` for the next attempt; returns its retry count.
    pub fn resume(&mut self) -> u32 {
        if matches!(self.state, SaveState::Retrying { .. }) {
            self.retry_count += 1;
        }
        self.state = SaveState::Attempting { retry_count: self.retry_count };
        self.retry_count
    }
}

#[cfg(test)]
mod tests {
    use wikisave_domain::ErrorKind;

    use super::*;

    fn response(status: u16) -> TransportOutcome {
        TransportOutcome::Response { status, status_text: String::new(), body: String::new() }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(backoff_delay(2), Duration::from_millis(4000));
        assert_eq!(backoff_delay(3), Duration::from_millis(8000));
        assert_eq!(backoff_delay(4), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(40), Duration::from_millis(10_000));
    }

    #[test]
    fn success_on_first_attempt() {
        let mut machine = SaveStateMachine::new(3);
        assert_eq!(machine.state(), &SaveState::Idle);

        assert_eq!(machine.start(), 0);
        assert_eq!(machine.advance(&response(200)), Step::Succeeded);
        assert_eq!(machine.state(), &SaveState::Succeeded);
        assert!(machine.is_terminal());
    }

    #[test]
    fn transient_failures_exhaust_three_retries() {
        let mut machine = SaveStateMachine::new(3);
        machine.start();

        let mut delays = Vec::new();
        let terminal = loop {
            match machine.advance(&TransportOutcome::TimedOut) {
                Step::Retry { delay, .. } => {
                    delays.push(delay);
                    machine.resume();
                }
                Step::Failed(error) => break error,
                Step::Succeeded => panic!("timeouts never succeed"),
            }
        };

        assert_eq!(
            delays,
            vec![Duration::from_millis(1000), Duration::from_millis(2000), Duration::from_millis(4000)]
        );
        assert_eq!(machine.retry_count(), 3);
        assert_eq!(terminal.user_message, "Save failed: Request timeout");
        assert_eq!(machine.state(), &SaveState::Failed);
    }

    #[test]
    fn conflict_retries_then_fails_with_conflict_message() {
        let mut machine = SaveStateMachine::new(3);
        machine.start();

        for expected in 0..3 {
            assert!(matches!(machine.advance(&response(409)), Step::Retry { .. }));
            assert_eq!(
                machine.state(),
                &SaveState::Retrying { retry_count: expected, delay: backoff_delay(expected) }
            );
            assert_eq!(machine.resume(), expected + 1);
        }

        match machine.advance(&response(409)) {
            Step::Failed(error) => assert_eq!(error.kind, ErrorKind::Conflict),
            other => panic!("expected terminal conflict, got {other:?}"),
        }
    }

    #[test]
    fn non_eligible_statuses_fail_immediately() {
        for status in [401, 413, 429] {
            let mut machine = SaveStateMachine::new(3);
            machine.start();
            assert!(matches!(machine.advance(&response(status)), Step::Failed(_)), "{status}");
            assert_eq!(machine.retry_count(), 0);
        }
    }

    #[test]
    fn zero_retries_fails_on_first_error() {
        let mut machine = SaveStateMachine::new(0);
        machine.start();
        assert!(matches!(machine.advance(&response(503)), Step::Failed(_)));
    }

    #[test]
    fn recovers_after_retry() {
        let mut machine = SaveStateMachine::new(3);
        machine.start();

        assert!(matches!(
            machine.advance(&TransportOutcome::Failed("reset".into())),
            Step::Retry { .. }
        ));
        assert_eq!(machine.resume(), 1);
        assert_eq!(machine.state(), &SaveState::Attempting { retry_count: 1 });
        assert_eq!(machine.advance(&response(204)), Step::Succeeded);
    }
}
