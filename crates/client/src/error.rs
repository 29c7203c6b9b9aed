//! Typed errors for the API client, with retryability classification.

use std::collections::BTreeMap;

/// Field → messages map as returned in validation error bodies.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors surfaced by [`crate::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status and (usually) a
    /// structured error body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the body, if present.
        code: Option<String>,
        /// Human-readable message.
        message: String,
        /// Server-provided field errors for validation failures.
        fields: Option<FieldErrors>,
    },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The caller aborted the request via its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// A 2xx response body could not be decoded.
    #[error("Response decoding failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a retry might help.
    ///
    /// Transient transport failures and server errors are retryable;
    /// client errors (4xx, including 401) and explicit cancellation are
    /// surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Api { status, .. } => *status >= 500,
            ApiError::Cancelled | ApiError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> ApiError {
        ApiError::Api {
            status,
            code: None,
            message: "test".to_string(),
            fields: None,
        }
    }

    #[test]
    fn server_errors_are_retryable() {
        assert!(api_error(500).is_retryable());
        assert!(api_error(502).is_retryable());
        assert!(api_error(503).is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!api_error(400).is_retryable());
        assert!(!api_error(401).is_retryable());
        assert!(!api_error(404).is_retryable());
        assert!(!api_error(409).is_retryable());
        assert!(!api_error(422).is_retryable());
    }

    #[test]
    fn transport_failures_are_retryable() {
        assert!(ApiError::Network("connection refused".into()).is_retryable());
        assert!(ApiError::Timeout.is_retryable());
    }

    #[test]
    fn cancellation_is_not_retryable() {
        assert!(!ApiError::Cancelled.is_retryable());
        assert!(!ApiError::Decode("bad json".into()).is_retryable());
    }
}
