//! Request/Response Bodies
//!
//! Wire format for the JSON API. Submission fields are all optional on the
//! wire: missing numeric fields default to 0 and a missing name to the empty
//! string, which then fails name validation downstream.

use serde::{Deserialize, Serialize};

use crate::ranking::SubmitRequest;

/// Body of `POST /api/leaderboard/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitScoreBody {
    /// Player name.
    #[serde(default)]
    pub player_name: String,
    /// Final score.
    #[serde(default)]
    pub score: i64,
    /// Level reached.
    #[serde(default)]
    pub level: i64,
    /// Total lines cleared.
    #[serde(default)]
    pub lines_cleared: i64,
    /// Game duration in seconds.
    #[serde(default)]
    pub game_duration: i64,
}

impl From<SubmitScoreBody> for SubmitRequest {
    fn from(body: SubmitScoreBody) -> Self {
        Self {
            player_name: body.player_name,
            score: body.score,
            level: body.level,
            lines_cleared: body.lines_cleared,
            game_duration: body.game_duration,
        }
    }
}

/// Success body of `POST /api/leaderboard/submit`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitScoreResponse {
    /// Always `true`; failures use [`ErrorBody`] instead.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// 1-based rank of the submitted score.
    pub rank: u32,
}

/// Query parameters of `GET /api/players/stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    /// Player name to aggregate over.
    pub name: Option<String>,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// What went wrong.
    pub error: String,
}
