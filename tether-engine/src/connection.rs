/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The session connection driver.
//!
//! A [`Connection`] is a cheap handle onto a single driver task that owns
//! every piece of mutable session state. Caller operations (`connect`,
//! `send`, `close`) and internal completions (timer firings, request
//! outcomes) arrive over channels and are processed strictly one at a time,
//! so no two callbacks for one session ever run concurrently and the
//! protocol state needs no locking.
//!
//! Two network operations may be outstanding at once, one send-request
//! (queue flush / handshake / keep-alive / close notification) and one
//! receive-request (long poll), never more of either kind. Every internal
//! completion carries the connection epoch; `connect()` bumps it, which
//! retires all timers and request outcomes belonging to the superseded
//! session generation.

use crate::events::SessionEvents;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tether_core::{ClientRequest, Envelope, ServerResponse, SessionId, TransportError};
use tether_session::{
    FlushGate, HeartbeatSchedule, OutboundQueue, SessionConfig, SessionInput, SessionState,
};
use tether_transport::{Reply, Transport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Caller operations, queued to the driver.
#[derive(Debug)]
enum Command {
    Connect,
    Send(Envelope),
    Close,
}

/// Internal completions, stamped with the epoch they belong to.
#[derive(Debug)]
enum DriverEvent {
    FlushFired { epoch: u64, generation: u64 },
    HeartbeatFired { epoch: u64, generation: u64 },
    SendDone { epoch: u64, outcome: Result<Reply, TransportError> },
    PollDone { epoch: u64, outcome: Result<Reply, TransportError> },
}

/// Handle to a long-polling session connection.
///
/// Clones share the same underlying session. All operations are
/// non-blocking: outcomes surface through the [`SessionEvents`] callbacks.
#[derive(Debug, Clone)]
pub struct Connection {
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<Mutex<SessionState>>,
}

impl Connection {
    /// Starts a connection driver and returns its handle.
    ///
    /// The driver runs until every handle is dropped; dropping the last
    /// handle cancels timers and aborts the outstanding poll without a
    /// close handshake.
    ///
    /// # Arguments
    /// * `config` - Session configuration
    /// * `transport` - The HTTP exchange implementation
    /// * `events` - Callback sink for inbound messages and close
    #[must_use]
    pub fn spawn(
        config: SessionConfig,
        transport: Arc<dyn Transport>,
        events: Arc<dyn SessionEvents>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (wakeups_tx, wakeups_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SessionState::Idle));

        let driver = Driver {
            heartbeat: HeartbeatSchedule::new(config.heartbeat_interval),
            config,
            transport,
            events,
            commands: commands_tx.downgrade(),
            wakeups: wakeups_tx,
            state: Arc::clone(&state),
            epoch: 0,
            session_id: SessionId::none(),
            queue: OutboundQueue::new(),
            flush: FlushGate::new(),
            closed: false,
            close_sent: false,
            send_in_flight: false,
            flush_deferred: false,
            poll_task: None,
        };

        tokio::spawn(driver.run(commands_rx, wakeups_rx));

        Self {
            commands: commands_tx,
            state,
        }
    }

    /// (Re)initializes the session and begins the protocol.
    ///
    /// Safe to call repeatedly; each call resets to "no id, empty queue,
    /// not closed" and schedules a single fresh send cycle.
    pub fn connect(&self) {
        let _ = self.commands.send(Command::Connect);
    }

    /// Appends an envelope to the outbound queue and schedules a flush.
    ///
    /// Non-blocking; never fails synchronously. Callers must not invoke
    /// this after `close()`: such envelopes are dropped.
    ///
    /// # Arguments
    /// * `name` - The message name
    /// * `payload` - Arbitrary structured payload
    pub fn send(&self, name: impl Into<String>, payload: Value) {
        let _ = self
            .commands
            .send(Command::Send(Envelope::new(name, payload)));
    }

    /// Closes the session. Idempotent.
    ///
    /// Cancels the outstanding receive-request, drops the queue, fires
    /// `on_close` exactly once, and, if a session id is held, transmits
    /// one final close notification.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    /// Returns a snapshot of the externally observable session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }
}

/// The single-writer task owning all session state.
struct Driver {
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    events: Arc<dyn SessionEvents>,
    /// Weak handle used to hand a `Connection` to callbacks; weak so the
    /// driver exits once callers drop theirs.
    commands: mpsc::WeakUnboundedSender<Command>,
    wakeups: mpsc::UnboundedSender<DriverEvent>,
    state: Arc<Mutex<SessionState>>,

    epoch: u64,
    session_id: SessionId,
    queue: OutboundQueue,
    flush: FlushGate,
    heartbeat: HeartbeatSchedule,
    closed: bool,
    close_sent: bool,
    send_in_flight: bool,
    flush_deferred: bool,
    poll_task: Option<JoinHandle<()>>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut wakeups: mpsc::UnboundedReceiver<DriverEvent>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // Every handle dropped: destruction needs nothing
                    // beyond canceling timers and the poll.
                    None => break,
                },
                Some(event) = wakeups.recv() => self.handle_event(event).await,
            }
        }
        self.abort_poll();
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => {
                self.reset_session();
                self.transition(SessionInput::Connect);
                self.arm_flush();
            }
            Command::Send(envelope) => {
                if self.closed {
                    tracing::debug!(name = %envelope.name, "send after close dropped");
                    return;
                }
                self.queue.push(envelope);
                self.arm_flush();
            }
            Command::Close => self.local_close().await,
        }
    }

    async fn handle_event(&mut self, event: DriverEvent) {
        match event {
            DriverEvent::FlushFired { epoch, generation } => {
                if epoch != self.epoch || !self.flush.fired(generation) {
                    return;
                }
                self.dispatch_flush();
            }
            DriverEvent::HeartbeatFired { epoch, generation } => {
                if epoch != self.epoch || !self.heartbeat.accepts(generation) || self.closed {
                    return;
                }
                tracing::debug!("heartbeat deadline reached, forcing keep-alive flush");
                self.dispatch_flush();
            }
            DriverEvent::SendDone { epoch, outcome } => {
                if epoch != self.epoch {
                    return;
                }
                self.send_in_flight = false;
                self.handle_send_outcome(outcome).await;
                if self.flush_deferred && !self.send_in_flight {
                    self.flush_deferred = false;
                    self.dispatch_flush();
                }
            }
            DriverEvent::PollDone { epoch, outcome } => {
                if epoch != self.epoch {
                    return;
                }
                self.poll_task = None;
                self.handle_poll_outcome(outcome).await;
            }
        }
    }

    /// Resets every field to its initial value and retires all timers and
    /// outstanding request completions of the previous generation.
    fn reset_session(&mut self) {
        self.epoch += 1;
        self.abort_poll();
        self.session_id.clear();
        self.queue.clear();
        self.flush.cancel_all();
        self.heartbeat.cancel();
        self.closed = false;
        self.close_sent = false;
        self.send_in_flight = false;
        self.flush_deferred = false;
    }

    async fn local_close(&mut self) {
        if self.closed {
            return;
        }
        self.abort_poll();
        self.closed = true;
        self.queue.clear();
        let id_held = self.session_id.is_established();
        self.transition(SessionInput::LocalClose { id_held });
        self.fire_on_close().await;
        // One final flush cycle: transmits the close notification when an
        // id is held, nothing otherwise.
        self.arm_flush();
    }

    /// The invalidate-and-close action every protocol failure funnels into.
    async fn invalidate(&mut self, reason: &str) {
        if self.closed {
            return;
        }
        tracing::warn!(reason, "session invalidated");
        self.session_id.clear();
        self.closed = true;
        self.abort_poll();
        self.queue.clear();
        self.flush.cancel_all();
        self.heartbeat.cancel();
        self.transition(SessionInput::Failure);
        self.fire_on_close().await;
    }

    /// Dispatches one send-request, honoring the at-most-one-outstanding
    /// invariant: a flush firing mid-request defers until completion.
    fn dispatch_flush(&mut self) {
        if self.send_in_flight {
            self.flush_deferred = true;
            return;
        }
        if self.closed && !self.session_id.is_established() {
            return;
        }
        if self.closed {
            if self.close_sent {
                return;
            }
            // The close body carries the latest id held right now; the id
            // is cleared before the outcome is known and at most one close
            // request is ever sent per session.
            let request = ClientRequest::close(&self.session_id);
            self.session_id.clear();
            self.close_sent = true;
            self.transition(SessionInput::CloseDispatched);
            self.spawn_send(request);
            return;
        }
        // Queue drained before the request resolves: at-most-once.
        let batch = self.queue.drain();
        let request = ClientRequest::send(&self.session_id, batch);
        self.spawn_send(request);
    }

    fn spawn_send(&mut self, request: ClientRequest) {
        self.send_in_flight = true;
        let body = request.to_bytes();
        let epoch = self.epoch;
        let transport = Arc::clone(&self.transport);
        let wakeups = self.wakeups.clone();
        tokio::spawn(async move {
            let outcome = transport.exchange(body).await;
            let _ = wakeups.send(DriverEvent::SendDone { epoch, outcome });
        });
    }

    async fn handle_send_outcome(&mut self, outcome: Result<Reply, TransportError>) {
        if self.close_sent {
            // Response to the close notification; nothing further to do.
            tracing::trace!(ok = outcome.is_ok(), "close notification settled");
            return;
        }
        match outcome {
            Err(error) => {
                if !self.closed {
                    self.invalidate(&format!("send transport failure: {error}"))
                        .await;
                }
            }
            Ok(reply) if !reply.is_success() => {
                if !self.closed {
                    self.invalidate(&format!("send answered with http status {}", reply.status))
                        .await;
                }
            }
            Ok(reply) => match ServerResponse::parse(&reply.body) {
                Ok(response) => self.process_response(response).await,
                Err(error) => {
                    if self.closed {
                        self.session_id.clear();
                    } else {
                        self.invalidate(&format!("malformed send response: {error}")).await;
                    }
                }
            },
        }
    }

    async fn handle_poll_outcome(&mut self, outcome: Result<Reply, TransportError>) {
        if self.closed {
            // Completion racing a local close; the channel is done.
            return;
        }
        match outcome {
            // The idle channel tolerates transient hiccups: restart, no
            // session invalidation.
            Err(error) => {
                tracing::debug!(%error, "poll transport failure, restarting");
                self.ensure_poll();
            }
            Ok(reply) if !reply.is_success() => {
                tracing::debug!(status = %reply.status, "poll rejected, restarting");
                self.ensure_poll();
            }
            Ok(reply) => match ServerResponse::parse(&reply.body) {
                Ok(response) => self.process_response(response).await,
                Err(error) => {
                    self.invalidate(&format!("malformed poll response: {error}")).await;
                }
            },
        }
    }

    /// Applies the shared response rules of both channels: adopt the latest
    /// id, deliver messages in order, honor a server close, then keep the
    /// receive channel and heartbeat running.
    async fn process_response(&mut self, response: ServerResponse) {
        self.session_id.adopt(response.id);

        if self.closed {
            // Delivery is suppressed after close, but a locally closed
            // session still owes its close notification; now that an id
            // is held the final flush can transmit it.
            self.arm_flush();
            return;
        }

        for envelope in response.messages {
            self.fire_on_message(envelope).await;
        }

        if response.close {
            // Messages in the same response were delivered above, before
            // the termination is acted upon.
            self.invalidate("server declared session closed").await;
            return;
        }

        self.transition(SessionInput::ValidExchange);
        self.ensure_poll();
        self.arm_heartbeat();
    }

    /// Starts the long poll when an id is held, the session is live, and no
    /// receive-request is outstanding.
    fn ensure_poll(&mut self) {
        if self.closed || !self.session_id.is_established() || self.poll_task.is_some() {
            return;
        }
        let body = ClientRequest::poll(&self.session_id).to_bytes();
        let epoch = self.epoch;
        let transport = Arc::clone(&self.transport);
        let wakeups = self.wakeups.clone();
        self.poll_task = Some(tokio::spawn(async move {
            let outcome = transport.exchange(body).await;
            let _ = wakeups.send(DriverEvent::PollDone { epoch, outcome });
        }));
    }

    fn abort_poll(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }

    fn arm_flush(&mut self) {
        if self.closed && !self.session_id.is_established() {
            return;
        }
        if let Some(generation) = self.flush.arm() {
            let epoch = self.epoch;
            let delay = self.config.flush_delay;
            let wakeups = self.wakeups.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = wakeups.send(DriverEvent::FlushFired { epoch, generation });
            });
        }
    }

    fn arm_heartbeat(&mut self) {
        let generation = self.heartbeat.arm();
        let epoch = self.epoch;
        let interval = self.heartbeat.interval();
        let wakeups = self.wakeups.clone();
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = wakeups.send(DriverEvent::HeartbeatFired { epoch, generation });
        });
    }

    fn transition(&self, input: SessionInput) {
        let mut state = self.state.lock();
        *state = state.apply(input);
    }

    fn callback_handle(&self) -> Option<Connection> {
        self.commands.upgrade().map(|commands| Connection {
            commands,
            state: Arc::clone(&self.state),
        })
    }

    async fn fire_on_message(&self, envelope: Envelope) {
        if let Some(connection) = self.callback_handle() {
            self.events
                .on_message(&connection, &envelope.name, envelope.payload)
                .await;
        }
    }

    async fn fire_on_close(&self) {
        if let Some(connection) = self.callback_handle() {
            self.events.on_close(&connection).await;
        }
    }
}
