//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    ///
    /// A `PORT` environment variable overrides the configured port.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("config.toml");
        let mut config: Self = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            info!("No config.toml found, creating default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port.parse()?;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

/// Server networking and general settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Server name shown in logs.
    #[serde(default = "default_name")]
    pub name: String,
    /// Liveness sweep interval in milliseconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            name: default_name(),
            sweep_interval_ms: default_sweep_interval(),
        }
    }
}

fn default_port() -> u16 {
    8080
}
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_name() -> String {
    "3D Gamers".to_string()
}
fn default_sweep_interval() -> u64 {
    50
}

/// Static asset directories served over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Directory served at the site root.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Directory served under `/games`.
    #[serde(default = "default_games_dir")]
    pub games_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            games_dir: default_games_dir(),
        }
    }
}

fn default_public_dir() -> String {
    "public".to_string()
}
fn default_games_dir() -> String {
    "games".to_string()
}
