//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool operations.
///
/// Upstream failures are never masked: each variant maps to exactly one way
/// the outbound geocoder call can go wrong.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The upstream service answered with a non-2xx status.
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream call exceeded the configured request timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// DNS, connection, TLS or body-read failure.
    #[error("Upstream request failed: {0}")]
    Network(String),

    /// The upstream declared JSON but the body did not parse.
    #[error("Upstream returned malformed JSON: {0}")]
    MalformedBody(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new upstream status error.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status reported by the upstream, if this is an upstream error.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_exposes_status_and_body() {
        let err = ToolError::upstream(503, "service down");
        assert_eq!(err.upstream_status(), Some(503));
        assert_eq!(err.to_string(), "Upstream returned HTTP 503: service down");
    }

    #[test]
    fn test_non_upstream_errors_have_no_status() {
        assert_eq!(ToolError::Timeout.upstream_status(), None);
        assert_eq!(ToolError::internal("x").upstream_status(), None);
    }
}
