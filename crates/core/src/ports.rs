//! Port interfaces the core logic depends on

use airvantage_domain::{Operation, Result};
use async_trait::async_trait;
use tracing::debug;

/// Source of operation snapshots, typically `GET operations/{uid}`
#[async_trait]
pub trait OperationSource: Send + Sync {
    /// Fetch the current state of an operation
    async fn fetch_operation(&self, uid: &str) -> Result<Operation>;
}

/// Receives raw responses when debug mode is on
///
/// `url` has sensitive query parameters already masked. `body` is the full
/// buffered response body, observed before any parsing.
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, url: &str, status: u16, body: &[u8]);
}

/// Default observer: forwards responses to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResponseObserver for TracingObserver {
    fn on_response(&self, url: &str, status: u16, body: &[u8]) {
        debug!(
            url = %url,
            status,
            body = %String::from_utf8_lossy(body),
            "AirVantage response"
        );
    }
}
