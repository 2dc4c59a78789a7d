/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! One-shot JSON POST helper.
//!
//! Collaborators outside the session core fetch supplementary data (keyed by
//! a request payload) with a single request/response exchange, not a long
//! poll. Any status of 300 or above is an error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tether_core::{Result, SessionError, TransportError};

/// Posts a JSON body to `url` and deserializes the JSON response.
///
/// # Arguments
/// * `url` - The target URL
/// * `data` - Request payload, serialized as the POST body
///
/// # Errors
/// Returns `TransportError` for connection failures, `SessionError::HttpStatus`
/// for a response status of 300 or above, and `WireError` is not involved:
/// an undecodable response body surfaces as `TransportError::Request`.
pub async fn post_json<T: DeserializeOwned>(url: &str, data: &impl Serialize) -> Result<T> {
    let response = reqwest::Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 300 {
        return Err(SessionError::HttpStatus { status }.into());
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_post_json_connection_failure_is_transport_error() {
        // Nothing listens on this port.
        let result: Result<Value> =
            post_json("http://127.0.0.1:1/coverage", &json!({"file": "a.ts"})).await;
        assert!(matches!(
            result,
            Err(tether_core::TetherError::Transport(_))
        ));
    }
}
