//! Operation poller - waits for server-side operations to finish

use std::time::Duration;

use airvantage_domain::constants::DEFAULT_POLL_INTERVAL;
use airvantage_domain::{AirVantageError, Operation, Result};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::ports::OperationSource;

/// Re-fetches an operation on a fixed interval until it is `FINISHED`
///
/// Fetch errors are returned as soon as they happen; there are no retries.
/// The server-side `timeoutDate` is ignored, only the caller's budget
/// counts. Dropping the returned future stops polling.
#[derive(Debug, Clone, Copy)]
pub struct OperationPoller {
    interval: Duration,
}

impl Default for OperationPoller {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL }
    }
}

impl OperationPoller {
    /// # Errors
    /// Returns `InvalidArgument` for a zero interval.
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(AirVantageError::InvalidArgument("poll interval must be greater than zero".to_string()));
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until operation `uid` is finished
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty uid
    /// - any error from `source`, unchanged
    /// - `PollTimeout` with the last snapshot once more than `timeout` has
    ///   elapsed since the first fetch
    pub async fn await_operation<S>(&self, source: &S, uid: &str, timeout: Duration) -> Result<Operation>
    where
        S: OperationSource + ?Sized,
    {
        if uid.is_empty() {
            return Err(AirVantageError::InvalidArgument("operation uid is empty".to_string()));
        }

        let start = Instant::now();
        let mut polls: u32 = 0;
        loop {
            let operation = source.fetch_operation(uid).await?;
            polls += 1;
            debug!(uid, state = %operation.state, polls, "Waiting for operation");

            if operation.is_finished() {
                info!(
                    uid,
                    polls,
                    success = operation.counters.success,
                    failure = operation.counters.failure,
                    "Operation finished"
                );
                return Ok(operation);
            }

            let waited = start.elapsed();
            if waited > timeout {
                warn!(uid, ?waited, state = %operation.state, "Operation wait timed out");
                return Err(AirVantageError::PollTimeout {
                    uid: uid.to_string(),
                    waited,
                    last: Box::new(operation),
                });
            }

            sleep(self.interval).await;
        }
    }

    /// [`await_operation`](Self::await_operation) followed by
    /// [`ensure_all_succeeded`], for bulk actions where every target must
    /// succeed.
    ///
    /// # Errors
    /// Same as `await_operation`, plus `PartialFailure`.
    pub async fn await_success<S>(&self, source: &S, uid: &str, timeout: Duration) -> Result<Operation>
    where
        S: OperationSource + ?Sized,
    {
        let operation = self.await_operation(source, uid, timeout).await?;
        ensure_all_succeeded(&operation)?;
        Ok(operation)
    }
}

/// Fail when a finished operation has targets in `FAILURE`
///
/// # Errors
/// Returns `PartialFailure` carrying the exact failure count.
pub fn ensure_all_succeeded(operation: &Operation) -> Result<()> {
    let failed = operation.failed_targets();
    if failed > 0 {
        return Err(AirVantageError::PartialFailure {
            uid: operation.uid.clone(),
            failed,
            total: operation.counters.total(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use airvantage_domain::{OperationCounters, OperationState};
    use async_trait::async_trait;

    use super::*;

    struct Scripted {
        states: Mutex<VecDeque<OperationState>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(states: &[OperationState]) -> Self {
            Self { states: Mutex::new(states.iter().copied().collect()), calls: Mutex::new(0) }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl OperationSource for Scripted {
        async fn fetch_operation(&self, uid: &str) -> Result<Operation> {
            *self.calls.lock().unwrap() += 1;
            let mut states = self.states.lock().unwrap();
            // The last scripted state repeats forever
            let state = if states.len() > 1 { states.pop_front() } else { states.front().copied() };
            Ok(Operation {
                uid: uid.to_string(),
                state: state.unwrap_or_default(),
                ..Operation::default()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_finished_snapshot() {
        use OperationState::{Finished, InProgress, Pending};
        let source = Scripted::new(&[Pending, InProgress, InProgress, Finished]);
        let poller = OperationPoller::default();

        let started = Instant::now();
        let op = poller.await_operation(&source, "op-1", Duration::from_secs(60)).await.unwrap();

        assert!(op.is_finished());
        assert_eq!(source.calls(), 4);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_with_last_snapshot() {
        let source = Scripted::new(&[OperationState::InProgress]);
        let poller = OperationPoller::default();

        let err = poller.await_operation(&source, "op-2", Duration::from_secs(12)).await.unwrap_err();

        match err {
            AirVantageError::PollTimeout { uid, waited, last } => {
                assert_eq!(uid, "op-2");
                assert!(waited > Duration::from_secs(12));
                assert_eq!(last.state, OperationState::InProgress);
            }
            other => panic!("expected poll timeout, got {other:?}"),
        }
        // Fetches at 0s, 5s, 10s and 15s
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_polls_twice() {
        let source = Scripted::new(&[OperationState::InProgress]);
        let err = OperationPoller::default()
            .await_operation(&source, "op", Duration::ZERO)
            .await
            .unwrap_err();

        assert!(err.last_operation().is_some());
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = OperationPoller::new(Duration::ZERO).unwrap_err();
        assert!(matches!(err, AirVantageError::InvalidArgument(_)));
        assert_eq!(OperationPoller::new(Duration::from_secs(1)).unwrap().interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn empty_uid_is_rejected_without_fetching() {
        let source = Scripted::new(&[OperationState::Finished]);
        let err = OperationPoller::default()
            .await_operation(&source, "", Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AirVantageError::InvalidArgument(_)));
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn partial_failure_reports_exact_count() {
        let op = Operation {
            uid: "import".into(),
            state: OperationState::Finished,
            counters: OperationCounters { success: 7, failure: 3, ..Default::default() },
            ..Operation::default()
        };

        match ensure_all_succeeded(&op).unwrap_err() {
            AirVantageError::PartialFailure { uid, failed, total } => {
                assert_eq!(uid, "import");
                assert_eq!(failed, 3);
                assert_eq!(total, 10);
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[test]
    fn partial_failure_total_handles_huge_counters() {
        let op = Operation {
            uid: "bulk".into(),
            state: OperationState::Finished,
            counters: OperationCounters { success: u32::MAX, failure: 1, ..Default::default() },
            ..Operation::default()
        };

        let err = ensure_all_succeeded(&op).unwrap_err();
        assert!(matches!(err, AirVantageError::PartialFailure { failed: 1, total, .. } if total == u64::from(u32::MAX) + 1));
    }

    #[test]
    fn all_succeeded_is_ok() {
        let op = Operation {
            uid: "import".into(),
            state: OperationState::Finished,
            counters: OperationCounters { success: 10, ..Default::default() },
            ..Operation::default()
        };
        assert!(ensure_all_succeeded(&op).is_ok());
    }
}
