/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Named message handler registry.
//!
//! One open mapping from message name to handler replaces per-consumer
//! dispatch switches: collaborators register the message kinds they care
//! about and the registry routes inbound envelopes to them. Unknown names
//! are logged and dropped, so new server-side message kinds do not break
//! older clients.

use crate::connection::Connection;
use crate::events::SessionEvents;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler for a single named message kind.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes one inbound payload.
    ///
    /// # Arguments
    /// * `connection` - Handle to the originating connection
    /// * `payload` - The message payload
    async fn handle(&self, connection: &Connection, payload: Value);
}

/// Adapter turning a plain closure into a [`MessageHandler`].
struct FnHandler<F>(F);

#[async_trait]
impl<F> MessageHandler for FnHandler<F>
where
    F: Fn(&Connection, Value) + Send + Sync,
{
    async fn handle(&self, connection: &Connection, payload: Value) {
        (self.0)(connection, payload);
    }
}

type CloseFn = dyn Fn(&Connection) + Send + Sync;

/// Open registry of named message handlers plus close observers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
    close_handlers: Vec<Arc<CloseFn>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a message name, replacing any previous one.
    ///
    /// # Arguments
    /// * `name` - The message name to route
    /// * `handler` - The handler invoked for each matching envelope
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, handler: Arc<dyn MessageHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Registers a plain closure for a message name.
    #[must_use]
    pub fn register_fn<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Connection, Value) + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnHandler(handler)))
    }

    /// Registers a close observer; all observers run on every close event.
    #[must_use]
    pub fn on_close_fn<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Connection) + Send + Sync + 'static,
    {
        self.close_handlers.push(Arc::new(handler));
        self
    }

    /// Returns the number of registered message names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no message handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .field("close_handlers", &self.close_handlers.len())
            .finish()
    }
}

#[async_trait]
impl SessionEvents for HandlerRegistry {
    async fn on_message(&self, connection: &Connection, name: &str, payload: Value) {
        match self.handlers.get(name) {
            Some(handler) => handler.handle(connection, payload).await,
            None => tracing::debug!(name, "unknown message"),
        }
    }

    async fn on_close(&self, connection: &Connection) {
        for handler in &self.close_handlers {
            handler(connection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConnectionBuilder;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_connection() -> Connection {
        ConnectionBuilder::new()
            .endpoint("http://127.0.0.1:1/api/main")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_registry_routes_by_name() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = Arc::clone(&hits);
        let registry = HandlerRegistry::new().register_fn("tick", move |_conn, payload| {
            assert_eq!(payload, json!({"n": 7}));
            hits_in.fetch_add(1, Ordering::SeqCst);
        });

        let conn = test_connection();
        registry.on_message(&conn, "tick", json!({"n": 7})).await;
        registry.on_message(&conn, "tock", json!({})).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_message_is_tolerated() {
        let registry = HandlerRegistry::new();
        let conn = test_connection();
        // Must not panic or error.
        registry.on_message(&conn, "whatever", json!(null)).await;
    }

    #[tokio::test]
    async fn test_close_handlers_all_run() {
        let count = Arc::new(AtomicUsize::new(0));
        let (a, b) = (Arc::clone(&count), Arc::clone(&count));
        let registry = HandlerRegistry::new()
            .on_close_fn(move |_| {
                a.fetch_add(1, Ordering::SeqCst);
            })
            .on_close_fn(move |_| {
                b.fetch_add(1, Ordering::SeqCst);
            });

        let conn = test_connection();
        registry.on_close(&conn).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_registry_replaces_duplicate_name() {
        let registry = HandlerRegistry::new()
            .register_fn("a", |_, _| {})
            .register_fn("a", |_, _| {});
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
