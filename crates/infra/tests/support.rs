//! Shared helpers for `airvantage-infra` integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use airvantage_core::ResponseObserver;
use airvantage_infra::{AirVantageClient, StaticTokenProvider};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Poll interval used against the mock server.
pub const FAST_POLL: Duration = Duration::from_millis(10);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("airvantage_infra=debug,airvantage_core=debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Client bound to `server` with a static bearer token and a fast poller.
pub fn client(server: &MockServer) -> AirVantageClient {
    init_tracing();
    AirVantageClient::builder(server.uri())
        .auth(Arc::new(StaticTokenProvider::new(TOKEN)))
        .poll_interval(FAST_POLL)
        .build()
        .expect("client should build against the mock server")
}

/// Operation snapshot in wire format.
pub fn operation_json(uid: &str, state: &str, success: u32, failure: u32) -> Value {
    json!({
        "uid": uid,
        "state": state,
        "counters": [
            {"state": "SUCCESS", "count": success},
            {"state": "FAILURE", "count": failure},
            {"state": "PENDING", "count": 0}
        ]
    })
}

/// Search page in wire format.
pub fn page_json(items: Value) -> Value {
    let count = items.as_array().map_or(0, Vec::len);
    json!({"items": items, "count": count, "size": count, "offset": 0})
}

/// Records every observed response.
#[derive(Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<(String, u16, String)>>,
}

impl RecordingObserver {
    pub fn seen(&self) -> Vec<(String, u16, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ResponseObserver for RecordingObserver {
    fn on_response(&self, url: &str, status: u16, body: &[u8]) {
        self.seen.lock().unwrap().push((url.to_string(), status, String::from_utf8_lossy(body).into_owned()));
    }
}
