//! HTTP Layer
//!
//! Thin JSON wrapper over the ranking engine and stats aggregator. Three
//! stateless endpoints, no sessions, no auth:
//!
//! - `GET  /api/leaderboard`        - current top 10
//! - `POST /api/leaderboard/submit` - submit a completed game
//! - `GET  /api/players/stats`      - per-player aggregates (`?name=`)

use std::net::SocketAddr;
use std::path::PathBuf;

pub mod protocol;
pub mod routes;

pub use routes::{router, AppState};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().unwrap(),
            db_path: PathBuf::from("blockfall.db"),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BLOCKFALL_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_addr),
            db_path: std::env::var("BLOCKFALL_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.db_path, PathBuf::from("blockfall.db"));
    }
}
