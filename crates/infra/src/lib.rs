//! # AirVantage Infrastructure
//!
//! Implementations of the core ports over HTTP.
//!
//! This crate contains:
//! - The reqwest-based HTTP client
//! - OAuth token acquisition and refresh
//! - The AirVantage API client and its endpoint groups
//! - The configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `airvantage-core`
//! - Depends on `airvantage-domain` and `airvantage-core`
//! - Contains all "impure" code (network, environment, files)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::*;
pub use errors::InfraError;
pub use http::*;
