//! Server-side asynchronous operations
//!
//! Bulk actions (imports, installs, template application) are tracked by an
//! [`Operation`] resource that the client re-fetches until it is finished.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::time::Timestamp;
use crate::impl_wire_state_conversions;

/// Lifecycle state of an operation (or of one of its targets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OperationState {
    Pending,
    InProgress,
    BeingCancelled,
    Cancelled,
    Failure,
    Success,
    Finished,
    /// Any state this client does not know about.
    #[default]
    Unknown,
}

impl_wire_state_conversions!(OperationState {
    Pending => "PENDING",
    InProgress => "IN_PROGRESS",
    BeingCancelled => "BEING_CANCELLED",
    Cancelled => "CANCELLED",
    Failure => "FAILURE",
    Success => "SUCCESS",
    Finished => "FINISHED",
    Unknown => "UNKNOWN",
});

impl OperationState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl Serialize for OperationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

/// How many targets of an operation sit in each state.
///
/// On the wire this is a list of `{"state": .., "count": ..}` entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounters {
    pub being_cancelled: u32,
    pub cancelled: u32,
    pub failure: u32,
    pub in_progress: u32,
    pub pending: u32,
    pub success: u32,
}

#[derive(Serialize, Deserialize)]
struct CounterEntry {
    #[serde(alias = "State")]
    state: String,
    #[serde(alias = "Count", default)]
    count: u32,
}

impl OperationCounters {
    /// Sum over every state; equals the number of targets once finished.
    pub fn total(&self) -> u64 {
        [self.being_cancelled, self.cancelled, self.failure, self.in_progress, self.pending, self.success]
            .into_iter()
            .map(u64::from)
            .sum()
    }

    fn slot(&mut self, state: OperationState) -> Option<&mut u32> {
        match state {
            OperationState::BeingCancelled => Some(&mut self.being_cancelled),
            OperationState::Cancelled => Some(&mut self.cancelled),
            OperationState::Failure => Some(&mut self.failure),
            OperationState::InProgress => Some(&mut self.in_progress),
            OperationState::Pending => Some(&mut self.pending),
            OperationState::Success => Some(&mut self.success),
            OperationState::Finished | OperationState::Unknown => None,
        }
    }
}

impl Serialize for OperationCounters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = [
            (OperationState::BeingCancelled, self.being_cancelled),
            (OperationState::Cancelled, self.cancelled),
            (OperationState::Failure, self.failure),
            (OperationState::InProgress, self.in_progress),
            (OperationState::Pending, self.pending),
            (OperationState::Success, self.success),
        ]
        .map(|(state, count)| CounterEntry { state: state.as_str().to_string(), count });

        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OperationCounters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Option::<Vec<CounterEntry>>::deserialize(deserializer)?.unwrap_or_default();

        let mut counters = Self::default();
        for entry in entries {
            // Unknown states are ignored
            let Ok(state) = entry.state.parse::<OperationState>() else {
                continue;
            };
            if let Some(slot) = counters.slot(state) {
                *slot = entry.count;
            }
        }
        Ok(counters)
    }
}

/// An operation descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub uid: String,
    #[serde(default)]
    pub state: OperationState,
    /// Server-side expiry; informational only.
    #[serde(rename = "timeoutDate", default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timestamp>,
    #[serde(default)]
    pub counters: OperationCounters,
}

impl Operation {
    pub const fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Number of targets that ended in `FAILURE`.
    pub const fn failed_targets(&self) -> u32 {
        self.counters.failure
    }
}

/// Body returned by endpoints that start an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRef {
    #[serde(alias = "Operation")]
    pub operation: String,
}
