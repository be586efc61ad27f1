//! Client -> Server message parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::{ProtocolError, Vec3};

/// Parsed client message.
///
/// `userData` and `objectData` are opaque payloads the server relays without
/// interpreting. The menu client reports `userData: null` and `game: null`
/// until a game module is loaded, so both tolerate null or absent values.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Position/rotation report for the sending player.
    #[serde(rename = "playerUpdate", rename_all = "camelCase")]
    PlayerUpdate {
        position: Vec3,
        rotation: Vec3,
        #[serde(default)]
        user_data: Value,
        #[serde(default)]
        game: Option<String>,
    },
    /// The sending player switched to another game module.
    #[serde(rename = "gameChange")]
    GameChange { game: String },
    /// A world object was placed in sandbox mode.
    #[serde(rename = "objectAdded", rename_all = "camelCase")]
    ObjectAdded { object_data: Value },
    /// A previously placed world object was removed.
    #[serde(rename = "objectRemoved", rename_all = "camelCase")]
    ObjectRemoved { object_id: String },
    /// Free-form chat line.
    #[serde(rename = "chatMessage")]
    ChatMessage { message: String },
}

impl ClientMessage {
    /// Message kinds this enum accepts, used to classify decode failures.
    const KINDS: [&'static str; 5] = [
        "playerUpdate",
        "gameChange",
        "objectAdded",
        "objectRemoved",
        "chatMessage",
    ];

    /// Decode one inbound text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Err(ProtocolError::MissingKind);
        };
        let kind = kind.to_owned();

        serde_json::from_value(value).map_err(|source| {
            if Self::KINDS.contains(&kind.as_str()) {
                ProtocolError::BadPayload { kind, source }
            } else {
                ProtocolError::UnknownKind(kind)
            }
        })
    }
}
