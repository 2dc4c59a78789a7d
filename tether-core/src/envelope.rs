/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The message envelope exchanged in both directions.
//!
//! An envelope is the minimal `{name, payload}` unit: outbound queue entries
//! and inbound delivered items share the same shape. On the wire the name is
//! carried as `m` and the payload as `d`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named message with an arbitrary structured payload.
///
/// Wire form: `{"m": <name>, "d": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message name.
    #[serde(rename = "m")]
    pub name: String,
    /// Arbitrary structured payload.
    #[serde(rename = "d", default)]
    pub payload: Value,
}

impl Envelope {
    /// Creates a new envelope.
    ///
    /// # Arguments
    /// * `name` - The message name
    /// * `payload` - Arbitrary structured payload
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_wire_shape() {
        let env = Envelope::new("ping", json!({"n": 1}));
        let wire = serde_json::to_string(&env).unwrap();
        assert_eq!(wire, r#"{"m":"ping","d":{"n":1}}"#);
    }

    #[test]
    fn test_envelope_roundtrip_payload_order() {
        let env: Envelope = serde_json::from_str(r#"{"m":"hello","d":{}}"#).unwrap();
        assert_eq!(env.name, "hello");
        assert_eq!(env.payload, json!({}));
    }

    #[test]
    fn test_envelope_missing_payload_defaults_to_null() {
        let env: Envelope = serde_json::from_str(r#"{"m":"tick"}"#).unwrap();
        assert_eq!(env.payload, Value::Null);
    }
}
