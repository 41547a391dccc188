//! Error types for the admin API client.

use thiserror::Error;

/// Errors surfaced by transports, the query cache and resource operations.
///
/// Payloads are plain strings so the error is `Clone`: one failed in-flight
/// request is handed to every caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server rejected the credentials (401/403).
    #[error("unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The addressed resource does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// Any other non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Maps a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, path: &str, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized {
                status,
                message: body,
            },
            404 => Self::NotFound {
                path: path.to_string(),
            },
            _ => Self::Status { status, body },
        }
    }

    /// Returns a short message suitable for an operator-facing surface.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the admin API. Check your connection.",
            Self::Timeout => "The admin API took too long to respond.",
            Self::Unauthorized { .. } => "Your session is not authorized. Sign in again.",
            Self::NotFound { .. } => "The requested record no longer exists.",
            Self::Status { status, .. } if *status >= 500 => {
                "The admin API is having trouble. Try again shortly."
            }
            Self::Status { .. } => "The admin API rejected the request.",
            Self::Decode(_) => "The admin API returned an unexpected response.",
            Self::Config(_) => "The client is misconfigured.",
        }
    }

    /// Whether a manual retry may succeed. Nothing is retried automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(401, "/admin/users", String::new()),
            ApiError::Unauthorized { status: 401, .. }
        ));
        assert_eq!(
            ApiError::from_status(404, "/admin/questions/q1", String::new()),
            ApiError::NotFound {
                path: "/admin/questions/q1".to_string()
            }
        );
        assert!(matches!(
            ApiError::from_status(422, "/admin/topics", "bad".to_string()),
            ApiError::Status { status: 422, .. }
        ));
    }

    #[test]
    fn test_user_messages() {
        assert!(
            ApiError::Network("refused".to_string())
                .user_message()
                .contains("connection")
        );
        assert!(
            ApiError::Status {
                status: 503,
                body: String::new()
            }
            .user_message()
            .contains("trouble")
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(
            ApiError::Status {
                status: 502,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ApiError::Status {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!ApiError::Decode("eof".to_string()).is_retryable());
    }
}
