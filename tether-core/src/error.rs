/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the Tether long-polling session client.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all Tether operations.
//!
//! Protocol failures are never returned from `connect`/`send`/`close`; they
//! funnel into the connection's invalidate-and-close action and are observable
//! through the close callback. These types carry the failure internally and
//! surface directly only from one-shot request helpers.

use thiserror::Error;

/// Result type alias using [`TetherError`] as the error type.
pub type Result<T> = std::result::Result<T, TetherError>;

/// Top-level error type for all Tether operations.
#[derive(Debug, Error)]
pub enum TetherError {
    /// Error decoding or encoding a wire body.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the underlying HTTP transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors that occur while parsing or building wire bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Response body was not parseable JSON.
    #[error("unparseable response body: {0}")]
    Json(String),

    /// Response body lacks a string `id` field.
    #[error("response body missing string id")]
    MissingId,

    /// Response `m` field is present but is not an array of envelopes.
    #[error("response message list is malformed")]
    InvalidMessages,
}

/// Errors in session layer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Endpoint URL failed validation.
    #[error("invalid endpoint url: {reason}")]
    InvalidEndpoint {
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// The server answered an exchange with a non-success status.
    #[error("server answered with http status {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// The server declared the session closed.
    #[error("server declared session closed")]
    ServerClose,

    /// Generic protocol failure that invalidates the session.
    #[error("protocol failure: {reason}")]
    ProtocolFailure {
        /// Description of the failure.
        reason: String,
    },

    /// Operation attempted on a closed session.
    #[error("session is closed")]
    Closed,
}

/// Errors from the underlying HTTP transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),
}
