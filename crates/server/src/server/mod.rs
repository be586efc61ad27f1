//! Relay server implementation.

use thiserror::Error;

pub mod ledger;
pub mod player;
pub mod registry;
pub mod relay;
pub mod router;

pub use relay::{Relay, run_sweep_loop};

/// Errors surfaced by the relay core.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A freshly minted identity collided with a live one. Records are
    /// never overwritten; the caller rejects the connection or object.
    #[error("generated identity {0} is already registered")]
    IdentityCollision(String),
}
