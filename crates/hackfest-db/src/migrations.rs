use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS teams (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            invite_code TEXT NOT NULL UNIQUE,
            created_by  INTEGER REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            phone         TEXT NOT NULL,
            college       TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            team_id       INTEGER REFERENCES teams(id),
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_users_team
            ON users(team_id);

        -- One submission per user is a storage invariant, not handler logic.
        CREATE TABLE IF NOT EXISTS submissions (
            id          INTEGER PRIMARY KEY,
            user_id     INTEGER NOT NULL UNIQUE REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            repo_link   TEXT NOT NULL,
            video_link  TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS feedback (
            id          INTEGER PRIMARY KEY,
            user_id     INTEGER REFERENCES users(id),
            body        TEXT NOT NULL,
            rating      TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_user
            ON feedback(user_id, id);

        CREATE TABLE IF NOT EXISTS sponsors (
            id    INTEGER PRIMARY KEY,
            name  TEXT NOT NULL,
            tier  TEXT NOT NULL,
            link  TEXT
        );

        CREATE TABLE IF NOT EXISTS live_updates (
            id          INTEGER PRIMARY KEY,
            text        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id          INTEGER PRIMARY KEY,
            text        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
