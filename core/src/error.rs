//! Error types for the marketplace request client.
//!
//! # Design
//! Every failure a call can hit is one `ApiError` variant. The client never
//! hands these to callers directly from the generic verbs: they are rendered
//! into the `error` string of an `ApiResult`. The `Display` text of each
//! variant is that string, so its wording is part of the public contract.

use thiserror::Error;

/// The network round-trip itself failed (DNS, connect, TLS, body read).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors produced while building a request or interpreting a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The transport could not complete the call.
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside 200..=299.
    #[error("API Error: {status} {body}")]
    Http { status: u16, body: String },

    /// A success response whose body is not the expected JSON.
    #[error("Invalid JSON response: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The path was not a relative resource path.
    #[error("Invalid resource path: {0}")]
    InvalidPath(String),
}

/// Errors raised while assembling an `ApiConfig` from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("either {0} or {1} must be set")]
    MissingEither(&'static str, &'static str),
}
