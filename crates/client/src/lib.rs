//! Typed HTTP client for the questlog API.
//!
//! Wraps the REST surface with default headers, bearer-token injection
//! via an async token provider, per-request timeout, cancellation, and
//! bounded exponential-backoff retry for transient failures.

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{ApiClient, StaticTokenProvider, TokenProvider};
pub use error::ApiError;
pub use retry::RetryConfig;
