//! Broadcast fan-out over the connection registry.
//!
//! Every frame is relayed to every connection; there is no interest
//! management or spatial partitioning, which caps this at toy scale.

use protocol::ServerMessage;
use tracing::{debug, error};

use super::player::Player;
use super::registry::Registry;

/// Send one message directly to one player.
pub fn send_to(player: &Player, message: &ServerMessage) {
    let Ok(frame) = serialize(message) else {
        return;
    };
    deliver(player, frame);
}

/// Deliver to every open connection except the sender.
pub fn broadcast_except(registry: &Registry, sender_id: &str, message: &ServerMessage) {
    let Ok(frame) = serialize(message) else {
        return;
    };
    for (id, player) in registry.all() {
        if id != sender_id {
            deliver(player, frame.clone());
        }
    }
}

/// Deliver to every open connection, the sender included. Reserved for
/// system-wide announcements with no originating peer.
pub fn broadcast_all(registry: &Registry, message: &ServerMessage) {
    let Ok(frame) = serialize(message) else {
        return;
    };
    for (_, player) in registry.all() {
        deliver(player, frame.clone());
    }
}

fn serialize(message: &ServerMessage) -> serde_json::Result<String> {
    message
        .to_frame()
        .inspect_err(|e| error!("Failed to serialize outbound message: {}", e))
}

/// Closed or failing recipients are skipped; no retry, no buffering.
fn deliver(player: &Player, frame: String) {
    if !player.is_open() {
        debug!("Skipping send to closed connection {}", player.id);
        return;
    }
    if player.handle.send(frame).is_err() {
        debug!("Failed to send to {}", player.id);
    }
}
