//! Error types for the todo API client.
//!
//! # Design
//! `Transport` means no response ever arrived (DNS, refused connection,
//! broken body). `Service` means the server answered with a status the
//! operation does not accept; the body is not interpreted, only the status
//! and its reason phrase are kept. Callers match on `status()` to tell a
//! missing todo (404) from a rejected payload (400).

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods, transports and the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never received a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server responded with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Build a `Service` error with the `API Error: 404 Not Found` message shape.
    pub fn service(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("");
        ApiError::Service {
            status,
            message: format!("API Error: {status} {reason}").trim_end().to_string(),
        }
    }

    /// HTTP status for `Service` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// A form value rejected before any request was built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
