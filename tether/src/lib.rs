/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # Tether
//!
//! A bidirectional session protocol client over HTTP long-polling.
//!
//! Tether maintains a logical persistent connection to a server using only
//! request/response HTTP: outbound messages are coalesced and flushed over
//! one channel while a standing long-poll request receives server pushes
//! over the other, with session-id continuity, keep-alive heartbeating, and
//! a single close notification on teardown.
//!
//! ## Features
//!
//! - **Two-channel multiplexing**: At most one send-request and one
//!   receive-request outstanding at any time
//! - **Debounced flushing**: Bursts of `send()` calls become one round trip
//! - **Session continuity**: Server-issued ids adopted on every response
//! - **Keep-alive**: Idle sessions are refreshed with empty probes
//! - **Open dispatch**: Handlers registered per message name, no central switch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! let registry = HandlerRegistry::new()
//!     .register_fn("compilationFinished", |_conn, data| {
//!         println!("compiled: {data}");
//!     })
//!     .on_close_fn(|_conn| println!("disconnected"));
//!
//! let connection = ConnectionBuilder::new()
//!     .endpoint("http://localhost:8080/api/main")
//!     .with_events(registry)
//!     .build()?;
//! connection.connect();
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Envelope, wire bodies, identifiers, and error definitions
//! - [`session`]: Session state machine, outbound queue, heartbeat, configuration
//! - [`transport`]: HTTP exchange trait and reqwest implementation
//! - [`engine`]: Connection driver, callbacks, handler registry, builder

pub mod core {
    //! Envelope, wire bodies, identifiers, and error definitions.
    pub use tether_core::*;
}

pub mod session {
    //! Session state machine, queueing, heartbeat, and configuration.
    pub use tether_session::*;
}

pub mod transport {
    //! HTTP exchange trait and reqwest implementation.
    pub use tether_transport::*;
}

pub mod engine {
    //! Connection driver, callbacks, handler registry, and builder.
    pub use tether_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use tether_core::{
        ClientRequest, EndpointUrl, Envelope, Result, ServerResponse, SessionError, SessionId,
        TetherError, TransportError, WireError,
    };

    // Session
    pub use tether_session::{
        HeartbeatSchedule, OutboundQueue, SessionConfig, SessionConfigBuilder, SessionInput,
        SessionState,
    };

    // Transport
    pub use tether_transport::{HttpTransport, Reply, Transport, post_json};

    // Engine
    pub use tether_engine::{
        Connection, ConnectionBuilder, HandlerRegistry, MessageHandler, NullEvents,
        ReconnectPolicy, SessionEvents,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _id = SessionId::none();
        let _state = SessionState::Idle;
        let _policy = ReconnectPolicy::default();
    }

    #[tokio::test]
    async fn test_facade_builds_a_connection() {
        let connection = ConnectionBuilder::new()
            .endpoint("http://127.0.0.1:8080/api/main")
            .build()
            .unwrap();
        assert_eq!(connection.state(), SessionState::Idle);
    }
}
