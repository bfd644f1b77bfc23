//! Client constants
//!
//! Centralized location for wire-level and timing constants.

use std::time::Duration;

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

// Operation polling
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS);
pub const DEFAULT_IMPORT_TIMEOUT: Duration = Duration::from_secs(60);

// URL layout
pub const API_V1_PATH: &str = "/api/v1/";
pub const API_V2_PATH: &str = "/api/v2/";
pub const OAUTH_PATH: &str = "/api/oauth/";
pub const COMPANY_PARAM: &str = "company";

/// Query parameters whose values are replaced by [`MASK`] before a URL is
/// logged or observed.
pub const MASKED_PARAMS: &[&str] = &["AUTHKEY"];
pub const MASK: &str = "***";

/// Class tags of the `com.sierrawireless` namespace in Java-object JSON,
/// including the trailing comma that separates them from the object.
pub const JAVA_OBJECT_NAMESPACE_SIERRA: &str = r#""com\.sierrawireless\.[A-Za-z0-9_.$]+","#;

// Systems import
pub const IMPORT_CSV_HEADER: [&str; 4] = ["NAME", "LABELS", "GATEWAY[SERIAL NUMBER]", "MQTT[password]"];
