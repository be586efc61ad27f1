//! Message definitions for the `type`-tagged JSON wire protocol.

mod client;
mod server;

pub use client::ClientMessage;
pub use server::{PlayerSnapshot, ServerMessage};
