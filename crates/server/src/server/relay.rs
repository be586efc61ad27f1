//! Relay state, connection lifecycle, and message dispatch.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use protocol::{ClientMessage, ServerMessage};
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::config::Config;

use super::RelayError;
use super::ledger::ObjectLedger;
use super::registry::Registry;
use super::router;

/// Process-wide relay state: who is connected and what they have placed.
///
/// Owned by a single `Arc<RwLock<_>>`; every dispatch, lifecycle event, and
/// sweep tick takes the write lock, so all mutations are serialized.
pub struct Relay {
    pub config: Config,
    pub registry: Registry,
    pub objects: ObjectLedger,
}

impl Relay {
    /// Create a new relay state.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            registry: Registry::new(),
            objects: ObjectLedger::new(),
        }
    }

    /// Admit a new connection.
    ///
    /// Sends the fresh identity back on `handle`, announces the join to every
    /// other player, then backfills the existing roster to the newcomer.
    pub fn connect(&mut self, handle: UnboundedSender<String>) -> Result<String, RelayError> {
        let id = self.registry.register(handle)?;
        info!(
            "Player {} connected. Total players: {}",
            id,
            self.registry.len()
        );

        if let Some(player) = self.registry.get(&id) {
            router::send_to(player, &ServerMessage::PlayerId { id: id.clone() });

            let joined = ServerMessage::PlayerJoined {
                player: player.snapshot(),
            };
            router::broadcast_except(&self.registry, &id, &joined);

            for (peer_id, peer) in self.registry.all() {
                if peer_id != &id {
                    let backfill = ServerMessage::PlayerJoined {
                        player: peer.snapshot(),
                    };
                    router::send_to(player, &backfill);
                }
            }
        }

        Ok(id)
    }

    /// Handle transport close: drop the record and announce the departure.
    ///
    /// The announcement goes out even if the sweeper already pruned the
    /// record, so peers hear exactly one `playerLeft` per connection.
    pub fn disconnect(&mut self, id: &str) {
        if self.registry.unregister(id) {
            info!(
                "Player {} disconnected. Total players: {}",
                id,
                self.registry.len()
            );
        }

        let left = ServerMessage::PlayerLeft {
            player_id: id.to_owned(),
        };
        router::broadcast_except(&self.registry, id, &left);
    }

    /// Decode and dispatch one inbound text frame.
    ///
    /// Nothing here closes the connection: undecodable frames are logged and
    /// dropped, and frames from an identity no longer in the registry are
    /// silently discarded.
    pub fn handle_frame(&mut self, sender_id: &str, text: &str) {
        let message = match ClientMessage::parse(text) {
            Ok(message) => message,
            Err(err) => {
                warn!("Ignoring frame from {}: {}", sender_id, err);
                return;
            }
        };

        if !self.registry.contains(sender_id) {
            return;
        }

        self.dispatch(sender_id, message);
    }

    fn dispatch(&mut self, sender_id: &str, message: ClientMessage) {
        match message {
            ClientMessage::PlayerUpdate {
                position,
                rotation,
                user_data,
                game,
            } => {
                self.registry
                    .update(sender_id, position, rotation, user_data.clone(), game);

                let update = ServerMessage::PlayerUpdate {
                    player_id: sender_id.to_owned(),
                    position,
                    rotation,
                    user_data,
                };
                router::broadcast_except(&self.registry, sender_id, &update);
            }
            ClientMessage::GameChange { game } => {
                self.registry.set_game(sender_id, game.clone());

                let change = ServerMessage::PlayerGameChange {
                    player_id: sender_id.to_owned(),
                    game,
                };
                router::broadcast_except(&self.registry, sender_id, &change);
            }
            ClientMessage::ObjectAdded { object_data } => {
                let object_id = match self.objects.add(object_data.clone(), sender_id) {
                    Ok(object_id) => object_id,
                    Err(err) => {
                        warn!("Rejecting object from {}: {}", sender_id, err);
                        return;
                    }
                };
                debug!("Player {} placed object {}", sender_id, object_id);

                let added = ServerMessage::ObjectAdded {
                    object_id,
                    object_data,
                    player_id: sender_id.to_owned(),
                };
                router::broadcast_except(&self.registry, sender_id, &added);
            }
            ClientMessage::ObjectRemoved { object_id } => {
                // Unknown object: no-op, and nothing is relayed.
                if !self.objects.remove(&object_id) {
                    return;
                }

                let removed = ServerMessage::ObjectRemoved {
                    object_id,
                    player_id: sender_id.to_owned(),
                };
                router::broadcast_except(&self.registry, sender_id, &removed);
            }
            ClientMessage::ChatMessage { message } => {
                let chat = ServerMessage::ChatMessage {
                    player_id: sender_id.to_owned(),
                    message,
                    timestamp: epoch_millis(),
                };
                router::broadcast_except(&self.registry, sender_id, &chat);
            }
        }
    }

    /// Prune registry entries whose transport has silently closed.
    ///
    /// This path never announces departures; `playerLeft` is the close
    /// handler's job. Racing the close path is safe since unregistering an
    /// absent identity is a no-op.
    pub fn sweep(&mut self) {
        let stale: Vec<String> = self
            .registry
            .all()
            .filter(|(_, player)| !player.is_open())
            .map(|(id, _)| id.clone())
            .collect();

        for id in stale {
            self.registry.unregister(&id);
            debug!(
                "Swept stale player {}. Total players: {}",
                id,
                self.registry.len()
            );
        }
    }

    /// Drop every connection; their writer tasks exit and the sockets close.
    pub fn shutdown(&mut self) {
        info!("Closing {} connections", self.registry.len());
        self.registry.clear();
    }
}

/// Epoch milliseconds at send time.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Run the liveness sweep until the process exits.
pub async fn run_sweep_loop(state: Arc<RwLock<Relay>>, sweep_interval_ms: u64) {
    let start = Instant::now() + Duration::from_millis(sweep_interval_ms);
    let mut ticker = interval_at(start, Duration::from_millis(sweep_interval_ms));
    // Sweeping twice back-to-back buys nothing, so skip missed ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        state.write().await.sweep();
    }
}
