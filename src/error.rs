//! Error types for the Redmine client.
//!
//! Callers distinguish failure kinds by matching on the enum variants rather
//! than inspecting message strings. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

/// Errors that can occur when talking to a Redmine server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or usage mistake: bad base endpoint, invalid page size,
    /// updating an object without an id, listing a non-listable type.
    /// Fatal; never caused by server state.
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication failed (HTTP 401 or 403): invalid credentials or
    /// insufficient permissions. No automatic retry or credential refresh.
    #[error("authentication failed: check your login/password or API key")]
    Auth,

    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The response body did not have the expected JSON shape.
    /// Indicates a protocol mismatch between client and server.
    #[error("unexpected response format: {0}")]
    Format(String),

    /// The server returned a non-2xx status that is not classified above.
    /// Carries the status and the raw response body for context.
    #[error("server returned HTTP {status}: {body}")]
    Status {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// Network or HTTP-level failure (connection refused, timeout, broken
    /// transfer).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Reading the caller-supplied upload stream failed locally. Recovered
    /// from the upload path so callers see the original I/O error instead of
    /// a generic transport failure.
    #[error("failed to read upload content: {0}")]
    UploadRead(#[source] std::io::Error),
}

/// Result type for all client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error from a non-2xx HTTP status.
    ///
    /// 401/403 become [`Error::Auth`], 404 becomes [`Error::NotFound`] with
    /// the given context, everything else is surfaced as [`Error::Status`].
    pub fn from_status(status: reqwest::StatusCode, context: &str, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Error::Auth,
            404 => Error::NotFound(context.to_string()),
            _ => Error::Status { status, body },
        }
    }

    /// Create a format error from any displayable cause.
    pub fn format(cause: impl std::fmt::Display) -> Self {
        Error::Format(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_401() {
        let err = Error::from_status(StatusCode::UNAUTHORIZED, "issues", String::new());
        assert!(matches!(err, Error::Auth));
    }

    #[test]
    fn test_from_status_403() {
        let err = Error::from_status(StatusCode::FORBIDDEN, "issues", String::new());
        assert!(matches!(err, Error::Auth));
    }

    #[test]
    fn test_from_status_404() {
        let err = Error::from_status(StatusCode::NOT_FOUND, "/issues/99.json", String::new());
        match err {
            Error::NotFound(context) => assert_eq!(context, "/issues/99.json"),
            _ => panic!("expected NotFound"),
        }
    }

    #[test]
    fn test_from_status_422_keeps_body() {
        let err = Error::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "issues",
            r#"{"errors":["Subject cannot be blank"]}"#.to_string(),
        );
        match err {
            Error::Status { status, body } => {
                assert_eq!(status.as_u16(), 422);
                assert!(body.contains("Subject cannot be blank"));
            }
            _ => panic!("expected Status"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::Config("page size must be greater than zero".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: page size must be greater than zero"
        );

        let err = Error::NotFound("issue 12".to_string());
        assert_eq!(err.to_string(), "resource not found: issue 12");
    }
}
