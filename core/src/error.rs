//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the server folds "missing" and
//! "owned by someone else" into 404, and views treat both alike. A 400 keeps
//! the server's per-field messages; every other non-2xx response lands in
//! `HttpError` with the raw status and body.

use std::fmt;

/// Errors returned by `TodoClient` parse methods and by transports.
#[derive(Debug)]
pub enum ApiError {
    /// 404: the list or item does not exist for this caller.
    NotFound,

    /// 401: the token is missing, expired or signed with another secret.
    Unauthorized,

    /// 400: the payload failed validation. One message per rejected field.
    Validation(Vec<String>),

    /// Any other unexpected status.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The request never produced a response.
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::Unauthorized => write!(f, "not authorized"),
            ApiError::Validation(messages) => {
                write!(f, "invalid request: {}", messages.join("; "))
            }
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
