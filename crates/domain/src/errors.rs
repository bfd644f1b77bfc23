//! Error types used throughout the client

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Operation;

/// Structured failure reported by the API.
///
/// Built from a non-2xx response whose body carries a non-empty `Error`
/// code. Callers branch on [`DomainError::code`] instead of parsing the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainError {
    /// URL path of the request that failed (e.g. `/api/v1/systems/abc`).
    pub path: String,
    /// Dotted error code (e.g. `system.not.found`).
    pub code: String,
    /// Substitution values, in server order.
    pub parameters: Vec<String>,
}

impl DomainError {
    pub fn new(path: impl Into<String>, code: impl Into<String>, parameters: Vec<String>) -> Self {
        Self { path: path.into(), code: code.into(), parameters }
    }

    /// Parameters joined the way they are rendered.
    pub fn parameters_joined(&self) -> String {
        self.parameters.join(", ")
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}: {}", self.path, self.code, self.parameters_joined())
    }
}

impl std::error::Error for DomainError {}

/// Main error type for the AirVantage client
#[derive(Error, Debug)]
pub enum AirVantageError {
    /// Non-2xx response without a body.
    #[error("error {status} {reason}")]
    Transport { status: u16, reason: String },

    /// No HTTP response at all (connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    #[error("unable to parse API error: {0}")]
    MalformedErrorBody(#[source] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unable to parse API response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation was still running when the wait budget ran out.
    ///
    /// `last` is the most recent snapshot so callers can inspect progress.
    #[error("wait.operation.timeout: operation {uid} not finished after {waited:?}")]
    PollTimeout { uid: String, waited: Duration, last: Box<Operation> },

    #[error("operation {uid} finished with {failed} failed target(s) out of {total}")]
    PartialFailure { uid: String, failed: u32, total: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AirVantageError {
    /// Server error code, when the failure came from a structured API error.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Domain(err) => Some(err.code.as_str()),
            _ => None,
        }
    }

    /// Last operation snapshot seen before a poll timeout.
    pub fn last_operation(&self) -> Option<&Operation> {
        match self {
            Self::PollTimeout { last, .. } => Some(last),
            _ => None,
        }
    }

    /// HTTP status for bodiless failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AirVantageError>;
