//! Per-connection player record.

use protocol::{PlayerSnapshot, Vec3};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Spawn position reported for every new player (matches the browser client).
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// A connected player session.
#[derive(Debug)]
pub struct Player {
    /// Unique player ID.
    pub id: String,
    /// Outbound frame channel. The socket writer task holds the receiving
    /// end, so the channel closes exactly when the transport goes away.
    pub handle: UnboundedSender<String>,
    /// Last reported position.
    pub position: Vec3,
    /// Last reported rotation.
    pub rotation: Vec3,
    /// Opaque per-game state relayed to peers.
    pub user_data: Value,
    /// Which game module the client is currently running.
    pub current_game: Option<String>,
}

impl Player {
    /// Create a new player at the spawn point.
    pub fn new(id: String, handle: UnboundedSender<String>) -> Self {
        Self {
            id,
            handle,
            position: SPAWN_POSITION,
            rotation: Vec3::default(),
            user_data: Value::Null,
            current_game: None,
        }
    }

    /// Whether the underlying transport still has a reader.
    pub fn is_open(&self) -> bool {
        !self.handle.is_closed()
    }

    /// Public state as announced in `playerJoined`.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            position: self.position,
            rotation: self.rotation,
        }
    }
}
