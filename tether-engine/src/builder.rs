/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Connection builder for fluent configuration.
//!
//! This module provides a builder API for configuring and starting a
//! long-polling connection. The transport defaults to the reqwest-backed
//! [`HttpTransport`] on the configured endpoint; tests and embedders may
//! substitute their own.

use crate::connection::Connection;
use crate::events::{NullEvents, SessionEvents};
use std::sync::Arc;
use std::time::Duration;
use tether_core::TetherError;
use tether_session::{SessionConfig, SessionConfigBuilder};
use tether_transport::{HttpTransport, Transport};

/// Builder for configuring a [`Connection`].
pub struct ConnectionBuilder {
    config: SessionConfigBuilder,
    events: Arc<dyn SessionEvents>,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfigBuilder::new(),
            events: Arc::new(NullEvents),
            transport: None,
        }
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.endpoint(url);
        self
    }

    /// Sets the flush debounce delay.
    #[must_use]
    pub fn flush_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.flush_delay(delay);
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.heartbeat_interval(interval);
        self
    }

    /// Sets the event callback sink.
    #[must_use]
    pub fn with_events(mut self, events: impl SessionEvents + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    /// Substitutes the transport implementation.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the connection and starts its driver.
    ///
    /// The connection is idle until `connect()` is called on the returned
    /// handle.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidEndpoint` when the endpoint is missing
    /// or invalid.
    pub fn build(self) -> Result<Connection, TetherError> {
        let config: SessionConfig = self.config.build()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.endpoint.clone())),
        };
        Ok(Connection::spawn(config, transport, self.events))
    }
}

impl std::fmt::Debug for ConnectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_session::SessionState;

    #[tokio::test]
    async fn test_builder_requires_endpoint() {
        assert!(ConnectionBuilder::new().build().is_err());
    }

    #[tokio::test]
    async fn test_builder_default_transport() {
        let connection = ConnectionBuilder::new()
            .endpoint("http://127.0.0.1:8080/api/main")
            .flush_delay(Duration::from_millis(5))
            .heartbeat_interval(Duration::from_secs(10))
            .build()
            .unwrap();
        assert_eq!(connection.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_builder_rejects_bad_scheme() {
        let result = ConnectionBuilder::new().endpoint("ftp://x").build();
        assert!(result.is_err());
    }
}
