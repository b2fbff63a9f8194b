use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Idempotent: every statement is `IF NOT EXISTS`, so reopening an existing
/// store is a no-op.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'user',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS scan_logs (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            username    TEXT NOT NULL,
            tool_type   TEXT NOT NULL,
            target      TEXT,
            result      TEXT NOT NULL,
            timestamp   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_scan_logs_user
            ON scan_logs(user_id, timestamp);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
