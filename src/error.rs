//! Error taxonomy for the Helius client.
//!
//! Every fallible operation returns [`Error`]. Failures that carry an HTTP
//! status (both the local pre-flight guard and errors reported by the
//! server) share the [`ApiError`] shape so callers can branch on its
//! predicates instead of matching message strings.

use std::fmt;

use thiserror::Error;

use crate::http::TransportError;
use crate::http::classify;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A status-bearing error: either returned by the API or produced by a local
/// validation guard before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("helius api error: {path} returned status {status_code}: {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status_code: u16,
    /// Raw response body, or the validation message for local guards.
    pub message: String,
    /// API path the error originated from.
    pub path: String,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            path: path.into(),
        }
    }

    /// A 400 raised locally when a required parameter is missing.
    pub(crate) fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(400, message, path)
    }

    pub fn is_not_found(&self) -> bool {
        classify::is_not_found(self.status_code)
    }

    pub fn is_rate_limited(&self) -> bool {
        classify::is_rate_limited(self.status_code)
    }

    pub fn is_unauthorized(&self) -> bool {
        classify::is_unauthorized(self.status_code)
    }

    pub fn is_forbidden(&self) -> bool {
        classify::is_forbidden(self.status_code)
    }

    /// True for 400..=499.
    pub fn is_client_error(&self) -> bool {
        classify::is_client_error(self.status_code)
    }

    /// True for 500..=599.
    pub fn is_server_error(&self) -> bool {
        classify::is_server_error(self.status_code)
    }
}

/// Why a call stopped before it could complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Cancelled,
    /// The caller's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "request cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Errors returned by [`HeliusClient`](crate::HeliusClient) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter was missing. No request was sent.
    #[error(transparent)]
    Validation(ApiError),

    /// The server answered with a status >= 400.
    #[error(transparent)]
    Upstream(ApiError),

    /// The request payload could not be serialized to JSON.
    #[error("{operation}: encode request")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A successful response body did not match the expected shape.
    #[error("{operation}: decode response")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request URL could not be assembled.
    #[error("{operation}: invalid request URL")]
    InvalidUrl {
        operation: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// Connection or timeout failure that persisted through every retry.
    #[error("{operation}: request failed after {attempts} attempt(s)")]
    Transport {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// The caller's context was cancelled or its deadline passed.
    #[error("{operation}: {reason}")]
    Cancelled {
        operation: &'static str,
        reason: CancelReason,
    },

    /// A construction-time option was out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The status-bearing error, for both local validation and upstream
    /// failures.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Validation(e) | Error::Upstream(e) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status_code)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// True when waiting and calling again may succeed: rate limiting,
    /// server errors and exhausted transport failures.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Upstream(e) => e.is_rate_limited() || e.is_server_error(),
            Error::Transport { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(404, "asset not found", "/assets");
        assert_eq!(
            err.to_string(),
            "helius api error: /assets returned status 404: asset not found"
        );

        let err = ApiError::new(500, "internal", "/priority-fee");
        assert!(err.to_string().contains("/priority-fee"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_api_error_predicates() {
        let err = ApiError::new(404, "", "/assets");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(!err.is_rate_limited());

        let err = ApiError::new(429, "", "/assets");
        assert!(err.is_rate_limited());
        assert!(err.is_client_error());

        let err = ApiError::new(503, "", "/assets");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());

        assert!(ApiError::new(401, "", "/").is_unauthorized());
        assert!(ApiError::new(403, "", "/").is_forbidden());
        assert!(!ApiError::new(403, "", "/").is_unauthorized());
    }

    #[test]
    fn test_validation_error_exposes_api_error() {
        let err = Error::Validation(ApiError::bad_request("asset ID is required", "/assets"));
        assert!(err.is_validation());
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.api_error().unwrap().path, "/assets");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_upstream_error_is_transient_for_retryable_statuses() {
        let rate_limited = Error::Upstream(ApiError::new(429, "slow down", "/assets"));
        assert!(rate_limited.is_transient());

        let server = Error::Upstream(ApiError::new(502, "bad gateway", "/assets"));
        assert!(server.is_transient());

        let not_found = Error::Upstream(ApiError::new(404, "missing", "/assets"));
        assert!(!not_found.is_transient());
    }

    #[test]
    fn test_encode_error_keeps_source() {
        let source = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = Error::Encode {
            operation: "create webhook",
            source,
        };
        assert_eq!(err.to_string(), "create webhook: encode request");
        assert!(err.source().is_some());
        assert!(err.api_error().is_none());
    }

    #[test]
    fn test_cancelled_display() {
        let err = Error::Cancelled {
            operation: "get asset",
            reason: CancelReason::DeadlineExceeded,
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "get asset: deadline exceeded");
    }
}
