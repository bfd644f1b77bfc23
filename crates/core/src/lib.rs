//! # AirVantage Core
//!
//! Pure client logic - no HTTP, no authentication.
//!
//! This crate contains:
//! - URL composition with tenant injection
//! - Response classification and payload decoding (plain and Java-object
//!   JSON)
//! - The operation poller
//! - Search criteria and the systems import CSV
//! - Port interfaces (traits) implemented by the infrastructure layer
//!
//! ## Architecture Principles
//! - Only depends on `airvantage-domain`
//! - All I/O goes through traits

pub mod import;
pub mod operation;
pub mod ports;
pub mod response;
pub mod search;
pub mod url_builder;

pub use import::ImportBatch;
pub use operation::{ensure_all_succeeded, OperationPoller};
pub use ports::{OperationSource, ResponseObserver, TracingObserver};
pub use response::{classify, JavaObjectFilter, Payload, ResponseClassifier};
pub use search::SearchCriteria;
pub use url_builder::{mask_url_params, ApiBase, QueryParams, UrlBuilder};
