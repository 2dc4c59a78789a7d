//! Common utilities shared across examples.

#![allow(dead_code)]

use std::env;

/// Default endpoint URL.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8080/bb/api/main";

/// Example configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    /// Endpoint URL of the long-poll server.
    pub url: String,
}

impl ExampleConfig {
    /// Creates a configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: env::var("TETHER_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
        }
    }
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
