//! Error types for request building and execution.
//!
//! # Design
//! A non-2xx status is never an error here: it comes back as an ordinary
//! `Response`. Errors are reserved for calls that could not be built or
//! performed, and for JSON conversions the caller asked for explicitly.

use thiserror::Error;

/// Result type for builder and response operations.
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// The target URL could not be parsed or uses an unsupported scheme.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Basic-auth credentials cannot be represented in the `user:password`
    /// form.
    #[error("cannot encode basic credentials: {0}")]
    AuthEncoding(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body")]
    Serialization(#[source] serde_json::Error),

    /// A typed query value could not be form-encoded.
    #[error("failed to encode query parameters")]
    QueryEncoding(#[from] serde_urlencoded::ser::Error),

    /// The response body is not valid JSON (or not the requested shape).
    #[error("failed to parse response body as JSON")]
    Parse(#[source] serde_json::Error),

    /// The call could not be performed: DNS, refused connection, broken I/O.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// A configured connect or socket timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The response arrived but its body could not be drained as UTF-8.
    #[error("failed to read response body from {url}")]
    BodyDecode {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// True when the call itself could not be completed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Timeout { .. } | Error::BodyDecode { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
