//! # Blockfall Leaderboard Server
//!
//! Score submission and leaderboard service for the Blockfall arcade game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   BLOCKFALL SERVER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  store/          - SQLite persistence                        │
//! │  ├── mod.rs      - Database handle, scoped connections       │
//! │  └── schema.rs   - Idempotent table creation                 │
//! │                                                              │
//! │  ranking.rs      - Rank computation, score submission,       │
//! │                    top-10 leaderboard rebuild                │
//! │  stats.rs        - Per-player aggregate statistics           │
//! │                                                              │
//! │  api/            - HTTP layer                                │
//! │  ├── protocol.rs - Request/response bodies                   │
//! │  └── routes.rs   - axum router and error mapping             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage model
//!
//! Three tables: `players`, `scores`, `leaderboard`. The `scores` table is
//! the source of truth (an immutable log of qualifying games); `leaderboard`
//! is a materialized top-10 view rebuilt wholesale on every qualifying
//! submission. Every request opens its own connection and releases it on
//! exit, so there is no shared mutable state between requests.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod ranking;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use ranking::{LeaderboardRow, SubmitOutcome, SubmitRequest};
pub use stats::PlayerStats;
pub use store::Database;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of entries the leaderboard holds.
pub const LEADERBOARD_SIZE: u32 = 10;

/// Minimum player name length, in characters, after trimming.
pub const NAME_MIN_CHARS: usize = 2;

/// Maximum player name length, in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 20;
