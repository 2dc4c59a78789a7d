/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core types for the long-polling session protocol.
//!
//! This module provides fundamental types used throughout the Tether client:
//! - [`SessionId`]: Opaque server-issued session token
//! - [`EndpointUrl`]: Validated target URL, immutable for a session's life

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session token issued by the server.
///
/// The empty string means "no session": never connected, or reset after a
/// protocol failure. Once issued, the id is carried on every request until
/// reset. The server may rotate ids on any response; the client always
/// adopts the latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates an empty session id (no session).
    #[must_use]
    pub const fn none() -> Self {
        Self(String::new())
    }

    /// Adopts a server-issued id value, replacing the current one.
    pub fn adopt(&mut self, value: impl Into<String>) {
        self.0 = value.into();
    }

    /// Clears the id back to "no session".
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns true once the server has issued an id.
    #[inline]
    #[must_use]
    pub fn is_established(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the raw id value ("" when no session is held).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_established() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "<none>")
        }
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validated endpoint URL, immutable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Creates an endpoint URL after validation.
    ///
    /// # Arguments
    /// * `url` - The target URL; must be non-empty and use http or https
    ///
    /// # Errors
    /// Returns `SessionError::InvalidEndpoint` if validation fails.
    pub fn new(url: impl Into<String>) -> std::result::Result<Self, SessionError> {
        let url = url.into();
        if url.is_empty() {
            return Err(SessionError::InvalidEndpoint {
                reason: "url is empty".to_string(),
            });
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SessionError::InvalidEndpoint {
                reason: format!("unsupported scheme in {url}"),
            });
        }
        Ok(Self(url))
    }

    /// Returns the URL as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_starts_empty() {
        let id = SessionId::none();
        assert!(!id.is_established());
        assert_eq!(id.as_str(), "");
        assert_eq!(id.to_string(), "<none>");
    }

    #[test]
    fn test_session_id_adopt_and_clear() {
        let mut id = SessionId::none();
        id.adopt("S1");
        assert!(id.is_established());
        assert_eq!(id.as_str(), "S1");

        id.adopt("S2");
        assert_eq!(id.as_str(), "S2");

        id.clear();
        assert!(!id.is_established());
    }

    #[test]
    fn test_endpoint_url_accepts_http_and_https() {
        assert!(EndpointUrl::new("http://localhost:8080/api/main").is_ok());
        assert!(EndpointUrl::new("https://example.com/poll").is_ok());
    }

    #[test]
    fn test_endpoint_url_rejects_bad_input() {
        assert!(matches!(
            EndpointUrl::new(""),
            Err(SessionError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            EndpointUrl::new("ws://example.com"),
            Err(SessionError::InvalidEndpoint { .. })
        ));
    }
}
