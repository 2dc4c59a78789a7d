/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # Tether Engine
//!
//! The session connection driver for the Tether long-polling client.
//!
//! This crate provides:
//! - **Connection**: The public handle, `connect`/`send`/`close` over a
//!   single-writer driver task
//! - **SessionEvents trait**: Callback interface for inbound messages and
//!   close notification
//! - **HandlerRegistry**: Open per-message-name handler dispatch
//! - **Builder API**: Fluent configuration for connection setup
//! - **ReconnectPolicy**: Capped backoff helper for caller-side reconnection

pub mod builder;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod reconnect;

pub use builder::ConnectionBuilder;
pub use connection::Connection;
pub use events::{NullEvents, SessionEvents};
pub use handlers::{HandlerRegistry, MessageHandler};
pub use reconnect::ReconnectPolicy;
