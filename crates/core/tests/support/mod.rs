//! Shared test helpers for `airvantage-core` integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use airvantage_core::OperationSource;
use airvantage_domain::{AirVantageError, Operation, OperationCounters, OperationState, Result};
use async_trait::async_trait;

/// Replays canned fetch results in order, then keeps returning the last one.
pub struct RecordedOperation {
    responses: Mutex<VecDeque<Result<Operation>>>,
    last: Mutex<Option<Operation>>,
    fetches: Mutex<Vec<String>>,
}

impl RecordedOperation {
    pub fn new(responses: Vec<Result<Operation>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperationSource for RecordedOperation {
    async fn fetch_operation(&self, uid: &str) -> Result<Operation> {
        self.fetches.lock().unwrap().push(uid.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(op)) => {
                *self.last.lock().unwrap() = Some(op.clone());
                Ok(op)
            }
            Some(Err(err)) => Err(err),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AirVantageError::NotFound(uid.to_string())),
        }
    }
}

pub fn snapshot(uid: &str, state: OperationState, counters: OperationCounters) -> Operation {
    Operation { uid: uid.to_string(), state, timeout: None, counters }
}

pub fn in_progress(uid: &str, pending: u32, success: u32) -> Operation {
    snapshot(
        uid,
        OperationState::InProgress,
        OperationCounters { pending, success, ..Default::default() },
    )
}

pub fn finished(uid: &str, success: u32, failure: u32) -> Operation {
    snapshot(
        uid,
        OperationState::Finished,
        OperationCounters { success, failure, ..Default::default() },
    )
}
