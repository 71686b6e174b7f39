//! Ranking Engine
//!
//! Decides whether a submitted score qualifies for the top 10, persists
//! qualifying games, and rebuilds the materialized `leaderboard` table.
//!
//! Rank is `1 + COUNT(scores with score >= submitted)`, so an equal score
//! submitted later lands on a numerically worse rank than the copies already
//! stored. Non-qualifying games are not persisted at all; only the computed
//! rank is reported back.
//!
//! All mutations of one submission run inside a single transaction. The
//! leaderboard rebuild is a wholesale delete-and-reinsert: correctness over
//! efficiency at 10 rows, and the rank invariant stays trivially checkable.
//! Ties are broken deterministically by earlier submission time, then by
//! row id.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{LEADERBOARD_SIZE, NAME_MAX_CHARS, NAME_MIN_CHARS};

/// Ranking engine errors.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Trimmed player name is shorter than 2 or longer than 20 characters.
    #[error("player name must be between 2 and 20 characters")]
    NameLength,

    /// Submitted score is zero or negative.
    #[error("score must be greater than zero")]
    NonPositiveScore,

    /// Underlying persistence operation failed; the whole submission was
    /// rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// One completed game, as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Player name; trimmed before any use.
    pub player_name: String,
    /// Final score. Must be strictly positive.
    pub score: i64,
    /// Level reached.
    pub level: i64,
    /// Total lines cleared.
    pub lines_cleared: i64,
    /// Game duration in seconds.
    pub game_duration: i64,
}

/// Result of a score submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// 1-based rank among all stored scores at submission time.
    pub rank: u32,
    /// Whether the score entered the top 10 (and was therefore persisted).
    pub qualified: bool,
    /// Human-readable message for the client.
    pub message: String,
}

/// One row of the top-10 listing, joined from `scores` and `players`.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    /// Player name.
    pub name: String,
    /// Score of the game.
    pub score: i64,
    /// Level reached.
    pub level: i64,
    /// Lines cleared.
    pub lines_cleared: i64,
    /// When the score was recorded.
    pub created_at: DateTime<Utc>,
}

/// Submit a completed game.
///
/// Validates input before touching storage, computes the rank, and if the
/// score makes the top 10 persists the game and rebuilds the leaderboard
/// inside one transaction. On any storage failure the transaction rolls
/// back and nothing is committed.
pub fn submit(conn: &mut Connection, request: &SubmitRequest) -> Result<SubmitOutcome, RankingError> {
    let name = request.player_name.trim();
    let name_chars = name.chars().count();
    if name_chars < NAME_MIN_CHARS || name_chars > NAME_MAX_CHARS {
        return Err(RankingError::NameLength);
    }
    if request.score <= 0 {
        return Err(RankingError::NonPositiveScore);
    }

    let tx = conn.transaction()?;

    let prior_or_equal: i64 = tx.query_row(
        "SELECT COUNT(*) FROM scores WHERE score >= ?1",
        params![request.score],
        |row| row.get(0),
    )?;
    let rank = (prior_or_equal + 1) as u32;

    if rank > LEADERBOARD_SIZE {
        // Nothing is persisted below rank 10; the message wording is part
        // of the client contract (see DESIGN.md).
        return Ok(SubmitOutcome {
            rank,
            qualified: false,
            message: "Your score didn't make the top 10, but your game has been recorded."
                .to_string(),
        });
    }

    let now = Utc::now();
    let player_id = resolve_or_create_player(&tx, name, now)?;

    tx.execute(
        "INSERT INTO scores (player_id, score, level, lines_cleared, game_duration, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            player_id,
            request.score,
            request.level,
            request.lines_cleared,
            request.game_duration,
            now,
        ],
    )?;

    rebuild_leaderboard(&tx, now)?;
    tx.commit()?;

    info!(player = name, score = request.score, rank, "qualifying score recorded");

    Ok(SubmitOutcome {
        rank,
        qualified: true,
        message: format!("Congratulations! Your score ranks #{rank}!"),
    })
}

/// Find the player by trimmed name (first match by lowest id) or create one.
///
/// The schema does not enforce name uniqueness, so the lowest-id match is
/// the canonical record for a name.
fn resolve_or_create_player(
    tx: &rusqlite::Transaction<'_>,
    name: &str,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM players WHERE name = ?1 ORDER BY id LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => Ok(id),
        None => {
            tx.execute(
                "INSERT INTO players (name, created_at) VALUES (?1, ?2)",
                params![name, now],
            )?;
            Ok(tx.last_insert_rowid())
        }
    }
}

/// Rebuild the materialized `leaderboard` table from `scores`: delete every
/// row, then re-insert the current top 10 with contiguous rank positions.
fn rebuild_leaderboard(tx: &rusqlite::Transaction<'_>, now: DateTime<Utc>) -> rusqlite::Result<()> {
    tx.execute("DELETE FROM leaderboard", [])?;
    tx.execute(
        "INSERT INTO leaderboard (player_id, score, rank_position, created_at)
         SELECT player_id, score,
                ROW_NUMBER() OVER (ORDER BY score DESC, created_at ASC, id ASC),
                ?1
         FROM scores
         ORDER BY score DESC, created_at ASC, id ASC
         LIMIT ?2",
        params![now, LEADERBOARD_SIZE],
    )?;
    Ok(())
}

/// Current top 10, read from the `scores` log rather than the materialized
/// table, so the listing is always consistent with the true score history.
pub fn list_top10(conn: &Connection) -> Result<Vec<LeaderboardRow>, RankingError> {
    let mut stmt = conn.prepare(
        "SELECT p.name, s.score, s.level, s.lines_cleared, s.created_at
         FROM scores s
         JOIN players p ON s.player_id = p.id
         ORDER BY s.score DESC, s.created_at ASC, s.id ASC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map(params![LEADERBOARD_SIZE], |row| {
            Ok(LeaderboardRow {
                name: row.get(0)?,
                score: row.get(1)?,
                level: row.get(2)?,
                lines_cleared: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::init_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn request(name: &str, score: i64) -> SubmitRequest {
        SubmitRequest {
            player_name: name.to_string(),
            score,
            level: 1,
            lines_cleared: 0,
            game_duration: 0,
        }
    }

    fn score_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_name_length_validation() {
        let mut conn = test_conn();

        for bad in ["", "A", " A ", &"x".repeat(21)] {
            let err = submit(&mut conn, &request(bad, 100)).unwrap_err();
            assert!(matches!(err, RankingError::NameLength), "name {bad:?}");
        }

        assert!(submit(&mut conn, &request("Bo", 100)).is_ok());
        assert!(submit(&mut conn, &request(&"y".repeat(20), 100)).is_ok());
        // Trimmed length is what counts.
        assert!(submit(&mut conn, &request("  Cleo  ", 100)).is_ok());
    }

    #[test]
    fn test_non_positive_score_rejected() {
        let mut conn = test_conn();
        for bad in [0, -1, -500] {
            let err = submit(&mut conn, &request("Alice", bad)).unwrap_err();
            assert!(matches!(err, RankingError::NonPositiveScore));
        }
        assert_eq!(score_count(&conn), 0);
    }

    #[test]
    fn test_validation_happens_before_storage() {
        let mut conn = test_conn();
        let _ = submit(&mut conn, &request("", 100));
        let _ = submit(&mut conn, &request("Alice", 0));
        assert_eq!(score_count(&conn), 0);
        let players: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .unwrap();
        assert_eq!(players, 0);
    }

    #[test]
    fn test_rank_sequence() {
        let mut conn = test_conn();

        let ranks: Vec<u32> = [500, 300, 900]
            .iter()
            .map(|&s| submit(&mut conn, &request("Alice", s)).unwrap().rank)
            .collect();
        assert_eq!(ranks, vec![1, 2, 1]);

        let board = list_top10(&conn).unwrap();
        let scores: Vec<i64> = board.iter().map(|row| row.score).collect();
        assert_eq!(scores, vec![900, 500, 300]);
    }

    #[test]
    fn test_equal_score_ranks_behind_existing() {
        let mut conn = test_conn();
        assert_eq!(submit(&mut conn, &request("Alice", 500)).unwrap().rank, 1);
        assert_eq!(submit(&mut conn, &request("Bob", 500)).unwrap().rank, 2);

        // Earlier submission of the tied score lists first.
        let board = list_top10(&conn).unwrap();
        assert_eq!(board[0].name, "Alice");
        assert_eq!(board[1].name, "Bob");
    }

    #[test]
    fn test_eleventh_score_not_persisted() {
        let mut conn = test_conn();

        // 11 distinct descending scores: 1100, 1000, ..., 100.
        for score in (0..11).map(|i| 1100 - i * 100) {
            let outcome = submit(&mut conn, &request("Alice", score)).unwrap();
            if score > 100 {
                assert!(outcome.qualified);
            } else {
                assert!(!outcome.qualified);
                assert_eq!(outcome.rank, 11);
            }
        }

        let board = list_top10(&conn).unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].score, 1100);
        assert_eq!(board[9].score, 200);
        assert_eq!(score_count(&conn), 10);
    }

    #[test]
    fn test_leaderboard_table_capped_with_contiguous_ranks() {
        let mut conn = test_conn();
        for score in (100..=1200).rev().step_by(100) {
            let _ = submit(&mut conn, &request("Alice", score)).unwrap();
        }

        let ranks: Vec<i64> = {
            let mut stmt = conn
                .prepare("SELECT rank_position FROM leaderboard ORDER BY rank_position")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap()
        };
        assert_eq!(ranks, (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_listing_ordered_non_increasing() {
        let mut conn = test_conn();
        for score in [42, 990, 7, 650, 650, 123] {
            let _ = submit(&mut conn, &request("Dana", score)).unwrap();
        }
        let board = list_top10(&conn).unwrap();
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_player_created_once_per_name() {
        let mut conn = test_conn();
        let _ = submit(&mut conn, &request("Alice", 100)).unwrap();
        let _ = submit(&mut conn, &request("  Alice ", 200)).unwrap();

        let players: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .unwrap();
        assert_eq!(players, 1);
    }

    #[test]
    fn test_empty_store_lists_empty() {
        let conn = test_conn();
        assert!(list_top10(&conn).unwrap().is_empty());
    }
}
