//! Build/test status reporter client.
//!
//! Connects to a development server, renders a one-line status from
//! compilation and test-run messages, and reconnects with a growing delay
//! whenever the session drops.

use anyhow::Result;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use tether::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};

mod common;
use common::{ExampleConfig, init_logging};

/// Status line state, shared between handlers.
#[derive(Debug, Default)]
struct StatusBoard {
    connected: bool,
    compilation: String,
    tests: String,
}

impl StatusBoard {
    fn render(&self) -> String {
        if !self.connected {
            return "Disconnected".to_string();
        }
        if self.compilation.is_empty() && self.tests.is_empty() {
            return "Connected".to_string();
        }
        format!("{}{}", self.compilation, self.tests)
    }
}

fn show(board: &Mutex<StatusBoard>) {
    info!("{}", board.lock().render());
}

fn registry(
    board: &Arc<Mutex<StatusBoard>>,
    closed: mpsc::UnboundedSender<()>,
) -> HandlerRegistry {
    let started = Arc::clone(board);
    let finished = Arc::clone(board);
    let tests = Arc::clone(board);
    let dropped = Arc::clone(board);

    HandlerRegistry::new()
        .register_fn("compilationStarted", move |_conn, _data| {
            let mut b = started.lock();
            b.connected = true;
            b.compilation = "Compiling".to_string();
            drop(b);
            show(&started);
        })
        .register_fn("compilationFinished", move |_conn, data| {
            let errors = data.get("errors").and_then(Value::as_u64).unwrap_or(0);
            let warnings = data.get("warnings").and_then(Value::as_u64).unwrap_or(0);
            let time = data.get("time").and_then(Value::as_u64).unwrap_or(0);
            let mut b = finished.lock();
            b.connected = true;
            b.compilation = format!("E:{errors} W:{warnings} {time}ms");
            drop(b);
            show(&finished);
        })
        .register_fn("testUpdated", move |_conn, data| {
            let mut line = String::new();
            if let Some(agents) = data.get("agents").and_then(Value::as_array) {
                for agent in agents {
                    let failed = agent.get("testsFailed").and_then(Value::as_u64).unwrap_or(0);
                    let total = agent.get("totalTests").and_then(Value::as_u64).unwrap_or(0);
                    let duration = agent.get("duration").and_then(Value::as_f64).unwrap_or(0.0);
                    line.push_str(&format!(" F:{failed}/{total} {duration:.0}ms"));
                }
            }
            let mut b = tests.lock();
            b.connected = true;
            b.tests = line;
            drop(b);
            show(&tests);
        })
        .register_fn("focusPlace", |_conn, data| {
            let path = data.get("fn").and_then(Value::as_str).unwrap_or("?");
            let pos = data.get("pos").cloned().unwrap_or(Value::Null);
            info!(path, %pos, "focus requested");
        })
        .on_close_fn(move |_conn| {
            dropped.lock().connected = false;
            let _ = closed.send(());
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    info!("connecting to {}", cfg.url);

    let board = Arc::new(Mutex::new(StatusBoard::default()));
    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();

    let connection = ConnectionBuilder::new()
        .endpoint(cfg.url.as_str())
        .with_events(registry(&board, closed_tx))
        .build()?;

    connection.connect();
    // Ask the server to stream coverage data along with status updates.
    connection.send("setOptions", json!({"coverage": true}));

    let mut policy = ReconnectPolicy::default();
    while closed_rx.recv().await.is_some() {
        show(&board);
        let delay = policy.next_delay();
        warn!("session closed, reconnecting in {delay:?}");
        tokio::time::sleep(delay).await;
        connection.connect();
        connection.send("setOptions", json!({"coverage": true}));
    }
    Ok(())
}
