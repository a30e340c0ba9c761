use reqwest::StatusCode;
use thiserror::Error;

use crate::codec::DecodeError;
use crate::config::ConfigError;

/// Failures of a remote operation.
///
/// Every variant is an operation failure. Nothing is retried internally.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The response body started with the error sentinel; carries the server's line verbatim
    #[error("{0}")]
    Server(String),

    /// Network failure, timeout or interrupted send. These are not distinguished.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials were rejected at the HTTP level
    #[error("Authentication rejected by server (HTTP {0})")]
    Unauthorized(StatusCode),

    #[error("Unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Expected a number in server response, got {0:?}")]
    InvalidNumber(String),

    #[error("Malformed server response: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether the server reported an application-level error
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_))
    }
}
