//! Error types for the grocery API client.
//!
//! # Design
//! `NotFound` keeps a dedicated variant because pages distinguish "the record
//! is gone" from other failures. Every other non-2xx response lands in `Http`
//! with the status and the message resolved from the body. The `Display`
//! output of each variant is the human-readable message shown to the user.

use thiserror::Error;

/// Substrings the API uses when a delete is blocked by existing orders.
const CONFLICT_MARKERS: [&str; 2] = ["referenced in existing orders", "has existing orders"];

/// Errors returned by `ApiClient` and the types built on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("{message}")]
    NotFound { message: String },

    /// The server returned a non-2xx status other than 404.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The request never produced a response (connection refused, timeout).
    #[error("{0}")]
    Network(String),

    /// The response body was not JSON or did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extra explanation sent by the server next to `error`.
    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Http { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    /// A referential-integrity failure: the record is still used by orders.
    pub fn is_conflict(&self) -> bool {
        match self {
            ApiError::Http { message, .. } => {
                CONFLICT_MARKERS.iter().any(|marker| message.contains(marker))
            }
            _ => false,
        }
    }
}
