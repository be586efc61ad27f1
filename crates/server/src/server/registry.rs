//! Connection registry: identity minting and membership lifecycle.

use std::collections::HashMap;

use protocol::Vec3;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::RelayError;
use super::player::Player;

/// Mint a `player_`-prefixed 128-bit random identity.
fn mint_player_id() -> String {
    use rand::Rng;
    format!("player_{:032x}", rand::rng().random::<u128>())
}

/// Owns every live player record, keyed by identity.
///
/// Iteration order is whatever the underlying map yields; callers must not
/// rely on it.
#[derive(Debug, Default)]
pub struct Registry {
    players: HashMap<String, Player>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    /// Register a new connection and return its identity.
    ///
    /// An identity collision is rejected rather than overwritten.
    pub fn register(&mut self, handle: UnboundedSender<String>) -> Result<String, RelayError> {
        let id = mint_player_id();
        if self.players.contains_key(&id) {
            return Err(RelayError::IdentityCollision(id));
        }
        self.players.insert(id.clone(), Player::new(id.clone(), handle));
        Ok(id)
    }

    /// Remove a record, reporting whether it was present. Idempotent.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.players.remove(id).is_some()
    }

    /// Overwrite a player's reported state. Unknown identities are ignored.
    pub fn update(
        &mut self,
        id: &str,
        position: Vec3,
        rotation: Vec3,
        user_data: Value,
        game: Option<String>,
    ) {
        let Some(player) = self.players.get_mut(id) else {
            debug!("Dropping update for unknown player {}", id);
            return;
        };
        player.position = position;
        player.rotation = rotation;
        player.user_data = user_data;
        player.current_game = game;
    }

    /// Overwrite only the current game label. Unknown identities are ignored.
    pub fn set_game(&mut self, id: &str, game: String) {
        if let Some(player) = self.players.get_mut(id) {
            player.current_game = Some(game);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// Whether the identity exists and its transport is still open.
    pub fn is_alive(&self, id: &str) -> bool {
        self.players.get(id).is_some_and(Player::is_open)
    }

    /// Iterate over all records.
    pub fn all(&self) -> impl Iterator<Item = (&String, &Player)> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Drop every record, closing all outbound channels.
    pub fn clear(&mut self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn register_creates_unique_identities() {
        let mut registry = Registry::new();
        let mut seen = HashSet::new();

        for _ in 0..100 {
            let (tx, _rx) = unbounded_channel();
            let id = registry.register(tx).unwrap();
            assert!(id.starts_with("player_"));
            assert!(seen.insert(id));
        }
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn new_player_spawns_with_default_state() {
        let mut registry = Registry::new();
        let (tx, _rx) = unbounded_channel();
        let id = registry.register(tx).unwrap();

        assert_eq!(registry.all().filter(|(pid, _)| *pid == &id).count(), 1);

        let player = registry.get(&id).unwrap();
        assert_eq!(player.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(player.rotation, Vec3::default());
        assert!(player.user_data.is_null());
        assert!(player.current_game.is_none());
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = Registry::new();
        let (tx, _rx) = unbounded_channel();
        let id = registry.register(tx).unwrap();

        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn update_unknown_identity_is_a_noop() {
        let mut registry = Registry::new();
        registry.update(
            "player_missing",
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::default(),
            Value::Null,
            None,
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn update_overwrites_reported_state() {
        let mut registry = Registry::new();
        let (tx, _rx) = unbounded_channel();
        let id = registry.register(tx).unwrap();

        registry.update(
            &id,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.5, 0.0),
            serde_json::json!({"type": "driving"}),
            Some("driving.js".into()),
        );

        let player = registry.get(&id).unwrap();
        assert_eq!(player.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(player.user_data["type"], "driving");
        assert_eq!(player.current_game.as_deref(), Some("driving.js"));
    }

    #[test]
    fn is_alive_tracks_the_transport() {
        let mut registry = Registry::new();
        let (tx, rx) = unbounded_channel();
        let id = registry.register(tx).unwrap();

        assert!(registry.is_alive(&id));
        drop(rx);
        assert!(!registry.is_alive(&id));
        assert!(!registry.is_alive("player_missing"));
    }
}
