//! HTTP transport

pub mod client;

pub use client::{BufferedResponse, HttpClient, HttpClientBuilder};
