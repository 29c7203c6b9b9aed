//! Identity-provider integration.
//!
//! Token issuance and session lifecycle live entirely with the external
//! provider; this module only consumes its verification capability.

pub mod provider;

pub use provider::{AuthConfig, AuthError, Claims, IdentityProvider, JwtIdentityProvider};
