/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Session state machine.
//!
//! The five externally observable states of a long-polling session, with an
//! explicit transition function. The driver feeds it inputs derived from
//! caller operations and exchange outcomes; the machine never acts on its
//! own.

use std::fmt;

/// Externally observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Initial state, before `connect()` has been called.
    Idle,
    /// No session id yet; the first send-request is in flight or scheduled.
    Handshaking,
    /// A session id is held and a receive-request is outstanding or about to
    /// be restarted.
    Connected,
    /// Close requested locally while a session id is held; the final close
    /// notification has not been dispatched yet.
    Closing,
    /// Terminal until `connect()` is called again.
    Closed,
}

/// Inputs that drive state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// `connect()` was called (initial call or re-entry after close).
    Connect,
    /// A well-formed, non-error response was processed on either channel.
    ValidExchange,
    /// `close()` was called locally. `id_held` tells whether a final close
    /// exchange is still owed to the server.
    LocalClose {
        /// Whether a session id was held when close was requested.
        id_held: bool,
    },
    /// Protocol failure: send-channel error, malformed body, or server close.
    Failure,
    /// The final close notification has been handed to the transport.
    CloseDispatched,
}

impl SessionState {
    /// Applies a transition input, returning the next state.
    ///
    /// `Connect` restarts the machine from any state. Inputs that have no
    /// meaning in the current state leave it unchanged; terminal `Closed`
    /// absorbs everything except `Connect`.
    #[must_use]
    pub fn apply(self, input: SessionInput) -> Self {
        let next = match (self, input) {
            (_, SessionInput::Connect) => Self::Handshaking,
            (Self::Closed, _) => Self::Closed,

            (Self::Handshaking, SessionInput::ValidExchange) => Self::Connected,
            (Self::Connected, SessionInput::ValidExchange) => Self::Connected,

            (Self::Handshaking | Self::Connected, SessionInput::LocalClose { id_held: true }) => {
                Self::Closing
            }
            (
                Self::Idle | Self::Handshaking | Self::Connected,
                SessionInput::LocalClose { id_held: false },
            ) => Self::Closed,

            (Self::Handshaking | Self::Connected | Self::Closing, SessionInput::Failure) => {
                Self::Closed
            }
            (Self::Closing, SessionInput::CloseDispatched) => Self::Closed,

            (state, _) => state,
        };
        if next != self {
            tracing::trace!(from = ?self, to = ?next, ?input, "session state transition");
        }
        next
    }

    /// Returns true for the terminal state.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Handshaking => "handshaking",
            Self::Connected => "connected",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_starts_handshake() {
        assert_eq!(
            SessionState::Idle.apply(SessionInput::Connect),
            SessionState::Handshaking
        );
    }

    #[test]
    fn test_handshake_to_connected_on_valid_exchange() {
        let state = SessionState::Handshaking.apply(SessionInput::ValidExchange);
        assert_eq!(state, SessionState::Connected);
        // Self-loop on every further valid exchange.
        assert_eq!(
            state.apply(SessionInput::ValidExchange),
            SessionState::Connected
        );
    }

    #[test]
    fn test_failure_closes_from_either_live_state() {
        assert_eq!(
            SessionState::Handshaking.apply(SessionInput::Failure),
            SessionState::Closed
        );
        assert_eq!(
            SessionState::Connected.apply(SessionInput::Failure),
            SessionState::Closed
        );
    }

    #[test]
    fn test_local_close_with_id_passes_through_closing() {
        let state = SessionState::Connected.apply(SessionInput::LocalClose { id_held: true });
        assert_eq!(state, SessionState::Closing);
        assert_eq!(
            state.apply(SessionInput::CloseDispatched),
            SessionState::Closed
        );
    }

    #[test]
    fn test_local_close_without_id_is_immediate() {
        assert_eq!(
            SessionState::Handshaking.apply(SessionInput::LocalClose { id_held: false }),
            SessionState::Closed
        );
    }

    #[test]
    fn test_closed_absorbs_everything_but_connect() {
        let closed = SessionState::Closed;
        assert_eq!(closed.apply(SessionInput::ValidExchange), closed);
        assert_eq!(closed.apply(SessionInput::Failure), closed);
        assert_eq!(
            closed.apply(SessionInput::Connect),
            SessionState::Handshaking
        );
    }

    #[test]
    fn test_reconnect_after_close_cycles() {
        let state = SessionState::Idle
            .apply(SessionInput::Connect)
            .apply(SessionInput::ValidExchange)
            .apply(SessionInput::Failure)
            .apply(SessionInput::Connect);
        assert_eq!(state, SessionState::Handshaking);
    }
}
