//! Error types for the todo API client.
//!
//! # Design
//! `NotFound`, `Unauthorized`, and `InvalidCredentials` get dedicated
//! variants because callers branch on them. Any other unexpected status lands
//! in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// 400 from `/token`.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// 401: missing or rejected bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 400 from a `/todos` route, e.g. a malformed id.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
