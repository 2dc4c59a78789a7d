/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # Tether Session
//!
//! Session layer bookkeeping for the Tether long-polling client.
//!
//! This crate provides the pure, I/O-free protocol state that the engine
//! drives:
//! - **State machine**: Tagged-enum session FSM with an explicit transition function
//! - **Outbound queue**: Ordered at-most-once batch queue with flush debouncing
//! - **Heartbeat handling**: Generation-based keep-alive deadline scheduling
//! - **Configuration**: Session configuration options

pub mod config;
pub mod heartbeat;
pub mod queue;
pub mod state;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use heartbeat::HeartbeatSchedule;
pub use queue::{FlushGate, OutboundQueue};
pub use state::{SessionInput, SessionState};
