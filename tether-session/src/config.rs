/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides configuration options for long-polling sessions.

use std::time::Duration;
use tether_core::{EndpointUrl, SessionError};

/// Default flush debounce delay.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(10);

/// Configuration for a long-polling session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Target URL, immutable for the session's life.
    pub endpoint: EndpointUrl,
    /// Debounce delay between a `send()` call and the flush it triggers.
    pub flush_delay: Duration,
    /// Inactivity interval after which a keep-alive probe is forced.
    pub heartbeat_interval: Duration,
}

impl SessionConfig {
    /// Creates a configuration with default timings.
    ///
    /// # Arguments
    /// * `endpoint` - The validated target URL
    #[must_use]
    pub fn new(endpoint: EndpointUrl) -> Self {
        Self {
            endpoint,
            flush_delay: DEFAULT_FLUSH_DELAY,
            heartbeat_interval: crate::heartbeat::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }

    /// Sets the flush debounce delay.
    #[must_use]
    pub fn with_flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = delay;
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    endpoint: Option<String>,
    flush_delay: Option<Duration>,
    heartbeat_interval: Option<Duration>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the flush debounce delay.
    #[must_use]
    pub const fn flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = Some(delay);
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub const fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Builds the configuration, validating the endpoint.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidEndpoint` when the endpoint is missing
    /// or fails validation.
    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let endpoint = EndpointUrl::new(self.endpoint.unwrap_or_default())?;
        let mut config = SessionConfig::new(endpoint);
        if let Some(delay) = self.flush_delay {
            config.flush_delay = delay;
        }
        if let Some(interval) = self.heartbeat_interval {
            config.heartbeat_interval = interval;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let endpoint = EndpointUrl::new("http://localhost:8080/api/main").unwrap();
        let config = SessionConfig::new(endpoint);
        assert_eq!(config.flush_delay, Duration::from_millis(10));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_session_config_with_methods() {
        let endpoint = EndpointUrl::new("http://localhost:8080/api/main").unwrap();
        let config = SessionConfig::new(endpoint)
            .with_flush_delay(Duration::from_millis(2))
            .with_heartbeat_interval(Duration::from_secs(5));
        assert_eq!(config.flush_delay, Duration::from_millis(2));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_requires_valid_endpoint() {
        assert!(SessionConfigBuilder::new().build().is_err());
        assert!(
            SessionConfigBuilder::new()
                .endpoint("ftp://nope")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_full() {
        let config = SessionConfigBuilder::new()
            .endpoint("https://example.com/poll")
            .flush_delay(Duration::from_millis(1))
            .heartbeat_interval(Duration::from_secs(60))
            .build()
            .unwrap();
        assert_eq!(config.endpoint.as_str(), "https://example.com/poll");
        assert_eq!(config.flush_delay, Duration::from_millis(1));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
    }
}
