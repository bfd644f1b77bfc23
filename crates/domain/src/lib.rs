//! # AirVantage Domain
//!
//! Value types and wire formats for the AirVantage fleet API.
//!
//! This crate contains:
//! - Resource types (Operation, System, Application, ...)
//! - The error taxonomy and `Result` alias
//! - Client configuration
//! - Wire and timing constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
