//! Stats Aggregator
//!
//! Per-player summary statistics computed over the `scores` log. Only
//! qualifying games are ever stored, so these aggregates cover a player's
//! top-10-worthy history, not every game played.

use rusqlite::{params, Connection};
use serde::Serialize;
use thiserror::Error;

/// Stats lookup errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// No player name was supplied (empty after trimming).
    #[error("player name is required")]
    MissingName,

    /// No score records exist for the given name.
    #[error("no record found for player")]
    UnknownPlayer,

    /// Underlying persistence operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Aggregate statistics for one player name.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStats {
    /// Number of recorded games.
    pub total_games: i64,
    /// Best score.
    pub highest_score: i64,
    /// Mean score, rounded to 2 decimal places.
    pub average_score: f64,
    /// Lines cleared across all recorded games.
    pub total_lines: i64,
    /// Highest level reached in any recorded game.
    pub highest_level: i64,
}

/// Compute aggregates over all score records belonging to players with the
/// given (trimmed) name. Fails with [`StatsError::UnknownPlayer`] when no
/// records match.
pub fn stats_for(conn: &Connection, player_name: &str) -> Result<PlayerStats, StatsError> {
    let name = player_name.trim();
    if name.is_empty() {
        return Err(StatsError::MissingName);
    }

    let (total_games, highest_score, average_score, total_lines, highest_level): (
        i64,
        Option<i64>,
        Option<f64>,
        Option<i64>,
        Option<i64>,
    ) = conn.query_row(
        "SELECT COUNT(*), MAX(s.score), AVG(s.score), SUM(s.lines_cleared), MAX(s.level)
         FROM scores s
         JOIN players p ON s.player_id = p.id
         WHERE p.name = ?1",
        params![name],
        |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        },
    )?;

    if total_games == 0 {
        return Err(StatsError::UnknownPlayer);
    }

    Ok(PlayerStats {
        total_games,
        highest_score: highest_score.unwrap_or(0),
        average_score: round2(average_score.unwrap_or(0.0)),
        total_lines: total_lines.unwrap_or(0),
        highest_level: highest_level.unwrap_or(0),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{submit, SubmitRequest};
    use crate::store::schema::init_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn play(conn: &mut Connection, name: &str, score: i64, level: i64, lines: i64) {
        submit(
            conn,
            &SubmitRequest {
                player_name: name.to_string(),
                score,
                level,
                lines_cleared: lines,
                game_duration: 60,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_aggregates() {
        let mut conn = test_conn();
        play(&mut conn, "Alice", 500, 3, 12);
        play(&mut conn, "Alice", 900, 5, 30);
        play(&mut conn, "Alice", 300, 2, 8);
        play(&mut conn, "Bob", 800, 4, 20);

        let stats = stats_for(&conn, "Alice").unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.highest_score, 900);
        assert_eq!(stats.average_score, 566.67);
        assert_eq!(stats.total_lines, 50);
        assert_eq!(stats.highest_level, 5);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut conn = test_conn();
        play(&mut conn, "Alice", 500, 1, 0);
        assert_eq!(stats_for(&conn, "  Alice ").unwrap().total_games, 1);
    }

    #[test]
    fn test_unknown_player() {
        let conn = test_conn();
        let err = stats_for(&conn, "Nobody").unwrap_err();
        assert!(matches!(err, StatsError::UnknownPlayer));
    }

    #[test]
    fn test_missing_name() {
        let conn = test_conn();
        for blank in ["", "   "] {
            let err = stats_for(&conn, blank).unwrap_err();
            assert!(matches!(err, StatsError::MissingName));
        }
    }
}
