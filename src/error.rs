//! Error types.
//!
//! Two families live here. [`Error`] surfaces infrastructure failures of the
//! server itself (binding a port, accepting a connection). [`ApiError`] is
//! what a handler returns when a request cannot be served; it renders as
//! `{"error": "<message>"}` with the status code of its [`ErrorKind`].

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::logs::PageError;
use crate::response::{IntoResponse, Json, Response};
use crate::runtime::RuntimeError;

/// The error type returned by the server's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable classification of request failures.
///
/// Consumers of the HTTP API only ever see the message text; the kind exists
/// so Rust callers can branch on a failure without matching strings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    ClientUnavailable,
    Inspect,
    List,
    Start,
    Stop,
    Logs,
    ReadLogs,
    Stats,
    DecodeStats,
    InvalidPage,
    InvalidFilter,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidPage | Self::InvalidFilter => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the call site does not supply a more specific one.
    pub fn message(self) -> &'static str {
        match self {
            Self::ClientUnavailable => "Failed to create Docker client",
            Self::Inspect           => "Failed to inspect container",
            Self::List              => "Failed to fetch containers",
            Self::Start             => "Failed to start container",
            Self::Stop              => "Failed to stop container",
            Self::Logs              => "Failed to get container logs",
            Self::ReadLogs          => "Failed to read container logs",
            Self::Stats             => "Failed to get container stats",
            Self::DecodeStats       => "Failed to decode stats JSON",
            Self::InvalidPage       => "Invalid page parameter",
            Self::InvalidFilter     => "Invalid filter type. Use 'all', 'running', or 'stopped'",
        }
    }
}

/// A request failure: a kind plus the free-text message sent to the client.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: &'static str,
}

impl ApiError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: kind.message() }
    }

    /// Logs the runtime failure and converts it into a request failure.
    ///
    /// The underlying cause stays in the log; the client only sees the
    /// fixed message of `kind`.
    pub fn runtime(kind: ErrorKind, err: &RuntimeError) -> Self {
        error!(?kind, error = %err, "runtime call failed");
        Self::new(kind)
    }

    /// Replaces the message while keeping the kind.
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }

    pub fn kind(&self) -> ErrorKind { self.kind }
    pub fn message(&self) -> &'static str { self.message }
    pub fn status(&self) -> StatusCode { self.kind.status() }
}

impl From<PageError> for ApiError {
    fn from(_: PageError) -> Self {
        Self::new(ErrorKind::InvalidPage)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Json(ErrorBody { error: self.message }).into_response();
        response.set_status(status);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_kinds_are_client_errors() {
        assert_eq!(ErrorKind::InvalidPage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidFilter.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Inspect.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorKind::ClientUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn custom_message_keeps_kind() {
        let err = ApiError::new(ErrorKind::List).with_message("Failed to fetch images");
        assert_eq!(err.kind(), ErrorKind::List);
        assert_eq!(err.to_string(), "Failed to fetch images");
    }

    #[test]
    fn renders_error_body() {
        let response = ApiError::new(ErrorKind::InvalidPage).into_response();
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), br#"{"error":"Invalid page parameter"}"#);
    }
}
