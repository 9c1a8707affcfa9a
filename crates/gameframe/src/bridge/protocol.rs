//! Cross-frame message protocol.
//! Must stay in sync with the game's `SendToReact.js` / handshake scripts.
//!
//! Every message is a JSON object discriminated by its `type` field:
//! ```text
//! host -> game   { "type": "AUTH", "token": <id> }
//! game -> host   { "type": "READY" }
//!                { "type": "AUTH_ACK", "id"?: any, "token"?: any }
//!                { "type": "GAME_DATA", "data": any }
//!                { "type": "GAME_RESULTS", "payload": { ...results } }
//! ```
//!
//! There is no version field; anything not listed here is rejected by
//! [`decode`] and dropped by the channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ProtocolError;
use crate::api::types::{GameResults, UserId};

/// Type tags of every message the game may send.
pub const GAME_MESSAGE_TYPES: [&str; 4] = ["READY", "AUTH_ACK", "GAME_DATA", "GAME_RESULTS"];

/// Messages the embedded game posts to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMessage {
    /// The game can accept authentication.
    Ready,
    /// The game received the token. May echo an id or token back.
    AuthAck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<Value>,
    },
    /// Free-form telemetry from the game.
    GameData {
        #[serde(default)]
        data: Value,
    },
    /// Partial or final questionnaire results.
    GameResults { payload: GameResults },
}

impl GameMessage {
    /// Wire name of this message's `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            GameMessage::Ready => "READY",
            GameMessage::AuthAck { .. } => "AUTH_ACK",
            GameMessage::GameData { .. } => "GAME_DATA",
            GameMessage::GameResults { .. } => "GAME_RESULTS",
        }
    }
}

/// Messages the host posts into the game frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    /// Hands the player's identifier to the game.
    Auth { token: UserId },
}

impl HostMessage {
    pub fn to_value(&self) -> Result<Value, ProtocolError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode an inbound message body.
///
/// Classifies the failure so callers can log unknown types differently
/// from broken payloads. Never panics.
pub fn decode(value: &Value) -> Result<GameMessage, ProtocolError> {
    let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;

    if !GAME_MESSAGE_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }

    GameMessage::deserialize(value).map_err(|source| ProtocolError::Malformed {
        kind: kind.to_string(),
        source,
    })
}

/// Decode an inbound message from its JSON text.
pub fn decode_str(json: &str) -> Result<GameMessage, ProtocolError> {
    let value: Value = serde_json::from_str(json)?;
    decode(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_wire_format() {
        let msg = HostMessage::Auth { token: UserId::from(123) };
        assert_eq!(msg.to_value().unwrap(), json!({ "type": "AUTH", "token": 123 }));

        let msg = HostMessage::Auth { token: UserId::from("token_de_prueba_123") };
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"type":"AUTH","token":"token_de_prueba_123"}"#
        );
    }

    #[test]
    fn decodes_ready_and_ack() {
        assert_eq!(decode(&json!({ "type": "READY" })).unwrap(), GameMessage::Ready);

        let ack = decode(&json!({ "type": "AUTH_ACK", "id": 9 })).unwrap();
        assert_eq!(ack, GameMessage::AuthAck { id: Some(json!(9)), token: None });

        let bare = decode(&json!({ "type": "AUTH_ACK" })).unwrap();
        assert_eq!(bare, GameMessage::AuthAck { id: None, token: None });
    }

    #[test]
    fn decodes_results() {
        let msg = decode(&json!({
            "type": "GAME_RESULTS",
            "payload": {
                "user_id": 5,
                "is_partial": false,
                "total_questions": 50,
                "answered_questions": 50,
                "responses": []
            }
        }))
        .unwrap();
        match msg {
            GameMessage::GameResults { payload } => {
                assert_eq!(payload.user_id, UserId::Numeric(5));
                assert!(payload.is_final());
            }
            other => panic!("Expected GameResults, got {:?}", other),
        }
    }

    #[test]
    fn classifies_failures() {
        assert!(matches!(decode(&json!("READY")), Err(ProtocolError::NotAnObject)));
        assert!(matches!(decode(&json!({ "kind": "READY" })), Err(ProtocolError::MissingType)));
        assert!(matches!(decode(&json!({ "type": 3 })), Err(ProtocolError::MissingType)));

        match decode(&json!({ "type": "PING" })) {
            Err(ProtocolError::UnknownType(kind)) => assert_eq!(kind, "PING"),
            other => panic!("Expected UnknownType, got {:?}", other),
        }

        match decode(&json!({ "type": "GAME_RESULTS", "payload": 1 })) {
            Err(ProtocolError::Malformed { kind, .. }) => assert_eq!(kind, "GAME_RESULTS"),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn decode_str_rejects_garbage() {
        assert!(decode_str("not json").is_err());
        assert_eq!(decode_str(r#"{"type":"READY"}"#).unwrap().kind(), "READY");
    }

    #[test]
    fn every_variant_tag_is_listed() {
        let samples = [
            GameMessage::Ready,
            GameMessage::AuthAck { id: None, token: None },
            GameMessage::GameData { data: Value::Null },
        ];
        for msg in samples {
            let value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value["type"], json!(msg.kind()));
            assert!(GAME_MESSAGE_TYPES.contains(&msg.kind()));
        }
    }
}
