//! Server -> Client message building.

use serde::Serialize;
use serde_json::Value;

use crate::Vec3;

/// A player's publicly visible state, as carried by `playerJoined`.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Outbound message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Direct reply assigning the connection its identity.
    #[serde(rename = "playerId")]
    PlayerId { id: String },
    /// A player joined (broadcast), or backfill of an existing player
    /// (sent directly to a newcomer).
    #[serde(rename = "playerJoined")]
    PlayerJoined { player: PlayerSnapshot },
    #[serde(rename = "playerLeft", rename_all = "camelCase")]
    PlayerLeft { player_id: String },
    #[serde(rename = "playerUpdate", rename_all = "camelCase")]
    PlayerUpdate {
        player_id: String,
        position: Vec3,
        rotation: Vec3,
        user_data: Value,
    },
    #[serde(rename = "playerGameChange", rename_all = "camelCase")]
    PlayerGameChange { player_id: String, game: String },
    #[serde(rename = "objectAdded", rename_all = "camelCase")]
    ObjectAdded {
        object_id: String,
        object_data: Value,
        player_id: String,
    },
    #[serde(rename = "objectRemoved", rename_all = "camelCase")]
    ObjectRemoved {
        object_id: String,
        player_id: String,
    },
    /// `timestamp` is server-assigned epoch milliseconds at send time.
    #[serde(rename = "chatMessage", rename_all = "camelCase")]
    ChatMessage {
        player_id: String,
        message: String,
        timestamp: u64,
    },
}

impl ServerMessage {
    /// Serialize to a text frame.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn wire(msg: &ServerMessage) -> Value {
        serde_json::from_str(&msg.to_frame().unwrap()).unwrap()
    }

    #[test]
    fn player_joined_wire_shape() {
        let msg = ServerMessage::PlayerJoined {
            player: PlayerSnapshot {
                id: "player_ab".into(),
                position: Vec3::new(0.0, 2.0, 0.0),
                rotation: Vec3::default(),
            },
        };

        assert_eq!(
            wire(&msg),
            json!({
                "type": "playerJoined",
                "player": {
                    "id": "player_ab",
                    "position": {"x": 0.0, "y": 2.0, "z": 0.0},
                    "rotation": {"x": 0.0, "y": 0.0, "z": 0.0}
                }
            })
        );
    }

    #[test]
    fn player_update_wire_shape() {
        let msg = ServerMessage::PlayerUpdate {
            player_id: "player_ab".into(),
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::default(),
            user_data: json!({"type": "driving"}),
        };

        assert_eq!(
            wire(&msg),
            json!({
                "type": "playerUpdate",
                "playerId": "player_ab",
                "position": {"x": 1.0, "y": 2.0, "z": 3.0},
                "rotation": {"x": 0.0, "y": 0.0, "z": 0.0},
                "userData": {"type": "driving"}
            })
        );
    }

    #[test]
    fn object_messages_wire_shape() {
        let added = ServerMessage::ObjectAdded {
            object_id: "obj_1".into(),
            object_data: json!({"type": "house"}),
            player_id: "player_ab".into(),
        };
        assert_eq!(
            wire(&added),
            json!({
                "type": "objectAdded",
                "objectId": "obj_1",
                "objectData": {"type": "house"},
                "playerId": "player_ab"
            })
        );

        let removed = ServerMessage::ObjectRemoved {
            object_id: "obj_1".into(),
            player_id: "player_ab".into(),
        };
        assert_eq!(
            wire(&removed),
            json!({"type": "objectRemoved", "objectId": "obj_1", "playerId": "player_ab"})
        );
    }

    #[test]
    fn chat_and_lifecycle_wire_shape() {
        let chat = ServerMessage::ChatMessage {
            player_id: "player_ab".into(),
            message: "hi".into(),
            timestamp: 1_700_000_000_000,
        };
        assert_eq!(
            wire(&chat),
            json!({
                "type": "chatMessage",
                "playerId": "player_ab",
                "message": "hi",
                "timestamp": 1_700_000_000_000u64
            })
        );

        let id = ServerMessage::PlayerId {
            id: "player_ab".into(),
        };
        assert_eq!(wire(&id), json!({"type": "playerId", "id": "player_ab"}));

        let left = ServerMessage::PlayerLeft {
            player_id: "player_ab".into(),
        };
        assert_eq!(
            wire(&left),
            json!({"type": "playerLeft", "playerId": "player_ab"})
        );

        let change = ServerMessage::PlayerGameChange {
            player_id: "player_ab".into(),
            game: "sandbox.js".into(),
        };
        assert_eq!(
            wire(&change),
            json!({"type": "playerGameChange", "playerId": "player_ab", "game": "sandbox.js"})
        );
    }
}
