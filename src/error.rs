//! Error taxonomy and the error responder.
//!
//! Two kinds of failure live here and they never mix:
//!
//! - [`ApiError`] — a request went wrong. Every stage and handler returns it,
//!   `?` carries it past whatever is left of the pipeline, and its
//!   [`IntoResponse`] impl turns it into the JSON error body the client sees.
//! - [`Error`] — the server itself went wrong (binding a port, accepting a
//!   connection). It ends the process, not a request.

use std::fmt;

use serde::Serialize;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

// ── Request failures ──────────────────────────────────────────────────────────

/// Every way a request can fail.
///
/// The set is closed on purpose: [`ApiError::status`] is the single place
/// that decides which status code a failure gets.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// A mutating request carried a missing or malformed field.
    #[error("{0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The credential was missing or wrong.
    #[error("{0}")]
    Auth(String),

    /// Anything else. The message is logged, never sent.
    #[error("{0}")]
    Unclassified(String),
}

/// Message sent to clients in place of an unclassified failure's detail.
const GENERIC_MESSAGE: &str = "Internal server error";

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
    pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }
    pub fn auth(msg: impl Into<String>) -> Self { Self::Auth(msg.into()) }
    pub fn unclassified(msg: impl Into<String>) -> Self { Self::Unclassified(msg.into()) }

    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_)   => Status::BadRequest,
            Self::Auth(_)         => Status::Unauthorized,
            Self::NotFound(_)     => Status::NotFound,
            Self::Unclassified(_) => Status::InternalServerError,
        }
    }

    /// The `type` tag written into the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_)   => "ValidationError",
            Self::Auth(_)         => "AuthError",
            Self::NotFound(_)     => "NotFoundError",
            Self::Unclassified(_) => "UnclassifiedError",
        }
    }

    /// The message a client is allowed to see.
    pub fn public_message(&self) -> &str {
        match self {
            Self::Unclassified(_) => GENERIC_MESSAGE,
            Self::Validation(m) | Self::NotFound(m) | Self::Auth(m) => m,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(format!("invalid request body: {e}"))
    }
}

// ── Error responder ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    status: u16,
}

/// The terminal stage: whatever failed, the client gets
/// `{"error": {"message", "type", "status"}}` with the matching status code.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Unclassified(detail) = &self {
            error!(detail = %detail, "unclassified error");
        }

        let status = self.status();
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                message: self.public_message(),
                kind: self.kind(),
                status: status.code(),
            },
        };

        match serde_json::to_vec(&envelope) {
            Ok(body) => Response::builder().status(status).json(body),
            Err(e) => {
                error!("failed to encode error body: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

// ── Infrastructure failures ───────────────────────────────────────────────────

/// The error type returned by the server's fallible operations.
///
/// Request-level failures are [`ApiError`]s and become responses. This type
/// surfaces infrastructure failures: binding to a port or accepting a
/// connection.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}
