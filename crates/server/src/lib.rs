//! 3D Gamers relay server library.

pub mod config;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use server::{Relay, RelayError, run_sweep_loop};
