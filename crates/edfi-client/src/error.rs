//! Error types for the Ed-Fi API client.

use thiserror::Error;

/// Errors raised by API requests.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The OAuth token endpoint rejected the credentials or returned an
    /// unusable body.
    #[error("login failed: {0}")]
    Login(String),

    /// The server answered with a status the operation does not accept.
    #[error("unexpected status {status} from {method} {url}: {message}")]
    UnexpectedStatus {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },

    /// A creation response carried no `Location` header to take the new
    /// resource identifier from.
    #[error("response from POST {url} carried no Location header")]
    MissingLocation { url: String },

    /// The response body was not the JSON shape the operation expects.
    #[error("invalid response body from {url}: {message}")]
    InvalidBody { url: String, message: String },
}

impl ClientError {
    /// Status code of the failing response, when the error wraps one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
