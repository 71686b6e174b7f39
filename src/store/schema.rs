//! Table Definitions
//!
//! Creates the three tables on startup. `CREATE TABLE IF NOT EXISTS` makes
//! initialization idempotent, so re-running it against an existing database
//! file is a no-op. No migrations and no secondary indices; the tables stay
//! small enough (leaderboard is capped at 10 rows) that primary keys suffice.

use rusqlite::Connection;

/// Create the `players`, `scores`, and `leaderboard` tables if absent.
///
/// `players.name` deliberately carries no UNIQUE constraint: the submission
/// path resolves players by first name match, mirroring the lookup contract.
/// Timestamps are written by the application; the column default is only a
/// fallback for rows inserted by hand.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS players (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        VARCHAR(20) NOT NULL,
            created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS scores (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id      INTEGER,
            score          INTEGER NOT NULL,
            level          INTEGER NOT NULL,
            lines_cleared  INTEGER NOT NULL,
            game_duration  INTEGER NOT NULL,
            created_at     TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (player_id) REFERENCES players(id)
        );

        CREATE TABLE IF NOT EXISTS leaderboard (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id      INTEGER,
            score          INTEGER NOT NULL,
            rank_position  INTEGER NOT NULL,
            created_at     TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (player_id) REFERENCES players(id)
        );",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_init_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"players".to_string()));
        assert!(tables.contains(&"scores".to_string()));
        assert!(tables.contains(&"leaderboard".to_string()));
    }

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO players (name) VALUES (?1)",
            rusqlite::params!["Alice"],
        )
        .unwrap();

        // Re-running must neither fail nor clobber existing rows.
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
