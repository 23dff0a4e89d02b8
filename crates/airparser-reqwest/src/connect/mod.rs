//! Reqwest client module.
//!
//! Wraps `reqwest` with the Airparser base URL, API key header, timeout and
//! user agent applied to every request.

mod client;
mod config;

pub use client::{AirparserClient, TRACING_TARGET};
pub use config::{AirparserConfig, DEFAULT_TIMEOUT_SECS};
