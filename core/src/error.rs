//! Error types for the Hunter API client.
//!
//! # Design
//! Every failure of a single operation lands in exactly one `ApiError`
//! variant. The variant is decided by the first pipeline stage that fails:
//! argument checks run before any I/O, then the transport, then the status
//! check, the JSON parse and finally the schema mapping. Only `HttpError`
//! carries an upstream status code.

use thiserror::Error;

/// Failures raised by a `Transport` before an HTTP response exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The owning client was closed; no connection is available.
    #[error("transport is closed")]
    Closed,

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, TCP, TLS or protocol level failure.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors returned by the Hunter services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Call arguments were rejected before any network call.
    #[error("{0}")]
    ArgumentError(String),

    /// The API answered with a non-2xx status.
    #[error("HTTP error occurred: {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    ParseError(String),

    /// The payload does not match the expected result model.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The transport failed; passed through without reclassification.
    #[error(transparent)]
    TransportError(#[from] TransportError),
}

/// Tag of an `ApiError`, for callers that map errors without inspecting
/// their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    Http,
    Parse,
    Validation,
    Transport,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ArgumentError(_) => ErrorKind::Argument,
            ApiError::HttpError { .. } => ErrorKind::Http,
            ApiError::ParseError(_) => ErrorKind::Parse,
            ApiError::ValidationError(_) => ErrorKind::Validation,
            ApiError::TransportError(_) => ErrorKind::Transport,
        }
    }

    /// Upstream HTTP status, present only for `HttpError`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
