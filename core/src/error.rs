//! Error types for the repository client.
//!
//! # Design
//! `NotFound` gets a dedicated variant so parsing can tell "the resource does
//! not exist" apart from "the server returned an unexpected status". The
//! async operations turn it into an absent result; it only reaches callers of
//! the lower-level `parse_*` methods. Transport failures are split by whether
//! retrying could have helped.

use thiserror::Error;

/// Errors returned by `RestClientRepository` and `HttpExecutor`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A transport failure that retrying cannot fix (bad URL, client setup).
    #[error("transport error: {0}")]
    Transport(String),

    /// Every attempt failed with a transient transport error.
    #[error("request failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl ApiError {
    /// Status code of the response behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
