//! AirVantage REST API client
//!
//! [`AirVantageClient`] owns the shared request pipeline (authentication,
//! URL building, response classification). The endpoint groups live in
//! their own modules as `impl AirVantageClient` blocks.
//!
//! Every call is a single attempt: errors are reported to the caller as-is,
//! nothing is retried.

pub mod applications;
pub mod auth;
pub mod client;
pub mod operations;
pub mod security;
pub mod systems;

pub use auth::{AccessTokenProvider, Grant, OAuthTokenProvider, StaticTokenProvider};
pub use client::{AirVantageClient, AirVantageClientBuilder, RequestBody};
pub use systems::DeleteOptions;
