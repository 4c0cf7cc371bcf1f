//! Error types for the Docshelf client.

use thiserror::Error;

/// Errors that can occur when talking to a Docshelf server.
///
/// `Backend` and `RequestFailed` carry the exact messages surfaced to
/// users, so their `Display` output is part of the API contract.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Server rejected the request without a usable error message
    #[error("Request failed ({0})")]
    RequestFailed(u16),

    /// Server reported a failure with its own message
    #[error("{0}")]
    Backend(String),

    /// Login succeeded but the reply carried no token
    #[error("No access_token in response")]
    MissingAccessToken,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Header name or value rejected by the transport
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error reading upload files or the token store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
