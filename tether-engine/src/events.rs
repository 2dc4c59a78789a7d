/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session callback interface.
//!
//! The driver invokes these callbacks from its own task, one at a time, in
//! delivery order; no two callbacks for one session ever run concurrently.
//! Callbacks receive a [`Connection`] handle and may call `send`/`close`/
//! `connect` on it; the commands are queued and processed after the
//! callback returns.

use crate::connection::Connection;
use async_trait::async_trait;
use serde_json::Value;

/// Callback interface for session events.
///
/// Set before `connect()` via the builder; consumed by the driver for the
/// life of the connection.
#[async_trait]
pub trait SessionEvents: Send + Sync {
    /// Called once per inbound envelope, in the order the server placed
    /// them within a response and across responses of one channel.
    ///
    /// # Arguments
    /// * `connection` - Handle to the originating connection
    /// * `name` - The message name
    /// * `payload` - The message payload
    async fn on_message(&self, connection: &Connection, name: &str, payload: Value);

    /// Called exactly once per close event, whether locally requested,
    /// server-declared, or caused by a protocol failure, and before any
    /// reconnection decision is made by the caller.
    ///
    /// # Arguments
    /// * `connection` - Handle to the closed connection
    async fn on_close(&self, connection: &Connection);
}

/// Default no-op event sink.
#[derive(Debug, Default)]
pub struct NullEvents;

#[async_trait]
impl SessionEvents for NullEvents {
    async fn on_message(&self, _connection: &Connection, _name: &str, _payload: Value) {}

    async fn on_close(&self, _connection: &Connection) {}
}
