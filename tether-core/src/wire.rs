/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! JSON wire bodies for the long-poll protocol.
//!
//! All traffic is HTTP POST of a JSON body to a single endpoint URL:
//! - send path: `{"id": <id>, "m": [envelope, ...]}` or `{"id": <id>, "close": true}`
//! - receive path: `{"id": <id>}`
//! - response (either path): `{"id": <id>, "close"?: true, "m"?: [envelope, ...]}`
//!
//! An empty `m` array on the send path doubles as a keep-alive and session-id
//! refresh probe.

use crate::envelope::Envelope;
use crate::error::WireError;
use crate::types::SessionId;
use serde::Serialize;
use serde_json::Value;

/// A client request body for either protocol channel.
///
/// Optional fields are omitted entirely when unused, so a poll body is
/// exactly `{"id": <id>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRequest {
    /// The session id held by the client ("" before the handshake).
    pub id: String,
    /// Close notification marker, only ever serialized as `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<bool>,
    /// Outbound envelopes drained from the queue.
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Envelope>>,
}

impl ClientRequest {
    /// Builds a send-path body carrying the drained queue.
    ///
    /// # Arguments
    /// * `id` - The currently held session id
    /// * `messages` - The drained outbound batch (may be empty)
    #[must_use]
    pub fn send(id: &SessionId, messages: Vec<Envelope>) -> Self {
        Self {
            id: id.as_str().to_string(),
            close: None,
            messages: Some(messages),
        }
    }

    /// Builds a close-notification body.
    ///
    /// # Arguments
    /// * `id` - The session id held at the moment the close flush fires
    #[must_use]
    pub fn close(id: &SessionId) -> Self {
        Self {
            id: id.as_str().to_string(),
            close: Some(true),
            messages: None,
        }
    }

    /// Builds a receive-path (long poll) body.
    #[must_use]
    pub fn poll(id: &SessionId) -> Self {
        Self {
            id: id.as_str().to_string(),
            close: None,
            messages: None,
        }
    }

    /// Serializes the body to JSON bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        // ClientRequest contains only string/bool/Value fields, none of
        // which can fail to serialize.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// A parsed server response body, shared by both channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerResponse {
    /// The (possibly rotated) session id; always adopted by the client.
    pub id: String,
    /// Server-declared session termination.
    pub close: bool,
    /// Inbound envelopes, delivered upward in array order.
    pub messages: Vec<Envelope>,
}

impl ServerResponse {
    /// Parses a response body.
    ///
    /// A body is well-formed when it is JSON with a string `id`; `close`
    /// defaults to false and `m` to an empty list. A present but non-array
    /// `m`, or an entry without a string name, is malformed.
    ///
    /// # Errors
    /// Returns `WireError` for any malformed body; the session layer treats
    /// every such error as a protocol failure.
    pub fn parse(body: &[u8]) -> Result<Self, WireError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| WireError::Json(e.to_string()))?;

        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or(WireError::MissingId)?
            .to_string();

        let close = matches!(value.get("close"), Some(v) if v.as_bool() == Some(true));

        let messages = match value.get("m") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    serde_json::from_value::<Envelope>(item.clone())
                        .map_err(|_| WireError::InvalidMessages)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(WireError::InvalidMessages),
        };

        Ok(Self {
            id,
            close,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_body_exact_shape() {
        let id = SessionId::none();
        let body = ClientRequest::send(
            &id,
            vec![
                Envelope::new("ping", json!({"n": 1})),
                Envelope::new("ping", json!({"n": 2})),
            ],
        );
        assert_eq!(
            String::from_utf8(body.to_bytes()).unwrap(),
            r#"{"id":"","m":[{"m":"ping","d":{"n":1}},{"m":"ping","d":{"n":2}}]}"#
        );
    }

    #[test]
    fn test_empty_send_body_is_keepalive_probe() {
        let mut id = SessionId::none();
        id.adopt("A");
        let body = ClientRequest::send(&id, Vec::new());
        assert_eq!(
            String::from_utf8(body.to_bytes()).unwrap(),
            r#"{"id":"A","m":[]}"#
        );
    }

    #[test]
    fn test_close_body_exact_shape() {
        let mut id = SessionId::none();
        id.adopt("A");
        let body = ClientRequest::close(&id);
        assert_eq!(
            String::from_utf8(body.to_bytes()).unwrap(),
            r#"{"id":"A","close":true}"#
        );
    }

    #[test]
    fn test_poll_body_carries_only_id() {
        let mut id = SessionId::none();
        id.adopt("S1");
        let body = ClientRequest::poll(&id);
        assert_eq!(
            String::from_utf8(body.to_bytes()).unwrap(),
            r#"{"id":"S1"}"#
        );
    }

    #[test]
    fn test_parse_full_response() {
        let resp =
            ServerResponse::parse(br#"{"id":"S1","m":[{"m":"hello","d":{}}]}"#).unwrap();
        assert_eq!(resp.id, "S1");
        assert!(!resp.close);
        assert_eq!(resp.messages.len(), 1);
        assert_eq!(resp.messages[0].name, "hello");
    }

    #[test]
    fn test_parse_close_with_messages() {
        let resp = ServerResponse::parse(
            br#"{"id":"S2","close":true,"m":[{"m":"bye","d":null}]}"#,
        )
        .unwrap();
        assert!(resp.close);
        assert_eq!(resp.messages.len(), 1);
    }

    #[test]
    fn test_parse_missing_id_is_malformed() {
        assert_eq!(
            ServerResponse::parse(br#"{"m":[{"m":"hello","d":{}}]}"#),
            Err(WireError::MissingId)
        );
        assert_eq!(
            ServerResponse::parse(br#"{"id":42}"#),
            Err(WireError::MissingId)
        );
    }

    #[test]
    fn test_parse_unparseable_body() {
        assert!(matches!(
            ServerResponse::parse(b"not json"),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn test_parse_non_array_messages_is_malformed() {
        assert_eq!(
            ServerResponse::parse(br#"{"id":"S1","m":"oops"}"#),
            Err(WireError::InvalidMessages)
        );
    }

    #[test]
    fn test_parse_absent_messages_is_empty() {
        let resp = ServerResponse::parse(br#"{"id":"S1"}"#).unwrap();
        assert!(resp.messages.is_empty());
    }
}
