//! Domain layer for the questlog campaign manager.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API server, and the HTTP client alike.

pub mod dice;
pub mod entities;
pub mod error;
pub mod export;
pub mod roles;
pub mod search;
pub mod types;
pub mod validation;
