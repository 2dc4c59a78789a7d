/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # Tether Core
//!
//! Core types, wire format, and error definitions for the Tether
//! long-polling session client.
//!
//! This crate provides the fundamental building blocks used across all
//! Tether crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Envelope**: The `{name, payload}` message unit exchanged in both directions
//! - **Wire format**: JSON request/response bodies for the long-poll protocol
//! - **Core types**: `SessionId`, `EndpointUrl`

pub mod envelope;
pub mod error;
pub mod types;
pub mod wire;

pub use envelope::Envelope;
pub use error::{Result, SessionError, TetherError, TransportError, WireError};
pub use types::{EndpointUrl, SessionId};
pub use wire::{ClientRequest, ServerResponse};
