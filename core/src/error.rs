//! Error types for the user admin core.
//!
//! # Design
//! `ApiError` covers everything that can go wrong between building a request
//! and decoding its response, including the host failing to deliver it at
//! all (`Transport`). `NotFound` keeps its own variant because a 404 on an
//! id-scoped call means the local row is stale, which callers log
//! differently from a server fault.
//!
//! `FormError` is the only error a user is expected to see: it carries the
//! per-field validation messages.

use thiserror::Error;

use crate::form::FieldErrors;

/// Errors produced while talking to the users API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection refused, DNS, I/O).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors returned when a modal form refuses to submit.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields failed validation. Nothing was sent.
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    /// A submit is already in flight for this form.
    #[error("a submit is already in progress")]
    Busy,

    /// The request could not be built from otherwise valid input.
    #[error(transparent)]
    Request(#[from] ApiError),
}

/// Errors raised while assembling client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    #[error("base URL must start with http:// or https://, got {0:?}")]
    UnsupportedScheme(String),
}
