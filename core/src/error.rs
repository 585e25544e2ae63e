//! Error types for the CloudHealth API client.
//!
//! # Design
//! `NotFound`, `Authentication` and `Conflict` get dedicated variants because
//! callers branch on them (e.g. "delete if exists"). Any status outside an
//! operation's table lands in `UnexpectedStatus` with the raw code.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the CloudHealth client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401; the API key was rejected.
    #[error("authentication with CloudHealth failed, check the API key")]
    Authentication,

    /// The server returned 404 on a list, get or delete.
    #[error("AWS Account not found")]
    NotFound,

    /// The server returned 422 on a create or update. CloudHealth does not
    /// say why, a duplicate name is the usual cause.
    #[error("Bad Request. Please check if a AWS Account with this name `{name}` already exists")]
    Conflict { name: String },

    /// The server returned a status the operation does not expect.
    #[error("Unknown Response with CloudHealth: `{0}`")]
    UnexpectedStatus(u16),

    /// The request could not be sent or the response could not be read,
    /// including timeouts.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload or query could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
