/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The HTTP exchange seam.
//!
//! Both protocol channels are plain POSTs of a JSON body to one endpoint
//! URL; the server holds the receive-path request open until it has data or
//! its own timeout elapses. The engine drives this trait and never sees
//! reqwest directly, which keeps the driver testable against a scripted
//! in-memory transport.

use async_trait::async_trait;
use bytes::Bytes;
use tether_core::{EndpointUrl, TransportError};

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The HTTP status code.
    pub status: u16,
    /// The raw response body.
    pub body: Bytes,
}

impl Reply {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// One POST of a JSON body to the configured endpoint.
///
/// Implementations must not impose a client-side timeout: the server's
/// long-poll hold time and transport-level failures are the only
/// terminators. Errors mean the request could not be sent or its response
/// could not be read; status interpretation belongs to the engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the exchange and returns the server's reply.
    ///
    /// # Arguments
    /// * `body` - Serialized JSON request body
    ///
    /// # Errors
    /// Returns `TransportError` on connection or read failure.
    async fn exchange(&self, body: Vec<u8>) -> Result<Reply, TransportError>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: EndpointUrl,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the given endpoint.
    ///
    /// The client keeps connections alive across exchanges and sets no
    /// request timeout.
    #[must_use]
    pub fn new(endpoint: EndpointUrl) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { endpoint, client }
    }

    /// Returns the endpoint this transport posts to.
    #[must_use]
    pub fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, body: Vec<u8>) -> Result<Reply, TransportError> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::CONNECTION, "keep-alive")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::trace!(%status, len = body.len(), "exchange complete");
        Ok(Reply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success_range() {
        let ok = Reply {
            status: 204,
            body: Bytes::new(),
        };
        assert!(ok.is_success());

        let not_ok = Reply {
            status: 503,
            body: Bytes::new(),
        };
        assert!(!not_ok.is_success());

        let redirect = Reply {
            status: 301,
            body: Bytes::new(),
        };
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_http_transport_keeps_endpoint() {
        let endpoint = EndpointUrl::new("http://127.0.0.1:8080/api/main").unwrap();
        let transport = HttpTransport::new(endpoint.clone());
        assert_eq!(transport.endpoint(), &endpoint);
    }
}
