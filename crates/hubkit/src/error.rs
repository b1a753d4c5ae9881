//! Error types for GitHub API operations.
//!
//! The client performs no retries and no recovery: transport, auth and
//! rate-limit failures all surface as [`Error::Http`] and callers decide
//! what to do with them.

use std::fmt;

/// Result type alias for GitHub API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed. Transport, auth and rate-limit errors all
    /// land here, with the status code when one was received.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A remote entity referenced by id or name does not exist.
    ///
    /// Only produced by the in-memory [`MockGithub`](crate::MockGithub);
    /// the real API reports missing entities as HTTP 404.
    #[error("unknown remote entity: {0}")]
    UnknownEntity(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Create an unknown-entity error.
    pub fn unknown(entity: impl fmt::Display) -> Self {
        Self::UnknownEntity(entity.to_string())
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_constructor() {
        let err = Error::http("connection reset", Some(502));
        match err {
            Error::Http { message, status } => {
                assert_eq!(message, "connection reset");
                assert_eq!(status, Some(502));
            }
            _ => panic!("Expected Error::Http"),
        }
    }

    #[test]
    fn test_http_display() {
        let err = Error::http("HTTP 403", Some(403));
        assert_eq!(format!("{}", err), "HTTP request failed: HTTP 403");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_unknown_entity_display() {
        let err = Error::unknown("team 42");
        assert_eq!(format!("{}", err), "unknown remote entity: team 42");
    }
}
