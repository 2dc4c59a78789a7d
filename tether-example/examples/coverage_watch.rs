//! Coverage data watcher.
//!
//! Fetches per-file coverage through the one-shot request helper, caches the
//! results, and drops the cache whenever the server announces fresh coverage
//! over the long-poll session.

use anyhow::Result;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tether::prelude::*;
use tracing::info;

mod common;
use common::{ExampleConfig, init_logging};

/// Per-file coverage cache, invalidated by `coverageUpdated` messages.
#[derive(Default)]
struct CoverageCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl CoverageCache {
    async fn fetch(&self, url: &str, path: &str) -> Result<Value> {
        if let Some(hit) = self.entries.lock().get(path) {
            return Ok(hit.clone());
        }
        let data: Value = post_json(url, &json!({ "fn": path })).await?;
        self.entries.lock().insert(path.to_string(), data.clone());
        Ok(data)
    }

    fn invalidate(&self) {
        self.entries.lock().clear();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    let coverage_url = format!("{}/coverage", cfg.url);

    let cache = Arc::new(CoverageCache::default());
    let invalidator = Arc::clone(&cache);

    let registry = HandlerRegistry::new()
        .register_fn("coverageUpdated", move |_conn, _data| {
            info!("coverage changed, dropping cache");
            invalidator.invalidate();
        })
        .on_close_fn(|_conn| info!("session closed"));

    let connection = ConnectionBuilder::new()
        .endpoint(cfg.url.as_str())
        .with_events(registry)
        .build()?;
    connection.connect();

    // Poll a file's coverage every few seconds; hits are served from cache
    // until the server invalidates it.
    let path = std::env::args().nth(1).unwrap_or_else(|| "src/index.ts".to_string());
    loop {
        match cache.fetch(&coverage_url, &path).await {
            Ok(data) => info!(%path, "coverage: {data}"),
            Err(error) => info!(%path, %error, "coverage unavailable"),
        }
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    }
}
