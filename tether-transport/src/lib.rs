/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # Tether Transport
//!
//! HTTP transport layer for the Tether long-polling client.
//!
//! This crate provides:
//! - **Transport trait**: The single-POST exchange seam the engine drives
//! - **HttpTransport**: reqwest-backed implementation (rustls, keep-alive, no timeout)
//! - **One-shot helper**: Plain JSON request/response POST for supplementary data

pub mod http;
pub mod oneshot;

pub use http::{HttpTransport, Reply, Transport};
pub use oneshot::post_json;
