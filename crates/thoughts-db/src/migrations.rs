use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (messages, likes, comments)");
        conn.execute_batch(
            "
            CREATE TABLE messages (
                id          TEXT PRIMARY KEY,
                first_name  TEXT NOT NULL,
                last_name   TEXT NOT NULL,
                text        TEXT NOT NULL,
                author_id   TEXT NOT NULL,
                like_count  INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_messages_created ON messages(created_at);
            CREATE INDEX idx_messages_author ON messages(author_id, created_at);

            -- The voter set: one row per (message, author)
            CREATE TABLE message_likes (
                message_id  TEXT NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
                author_id   TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                PRIMARY KEY (message_id, author_id)
            );

            CREATE INDEX idx_message_likes_author ON message_likes(author_id);

            -- No foreign key on message_id: comments survive message deletion
            CREATE TABLE comments (
                id                   TEXT PRIMARY KEY,
                message_id           TEXT NOT NULL,
                author_id            TEXT NOT NULL,
                author_display_name  TEXT NOT NULL,
                text                 TEXT NOT NULL,
                created_at           TEXT NOT NULL
            );

            CREATE INDEX idx_comments_message ON comments(message_id, created_at);
            CREATE INDEX idx_comments_author ON comments(author_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
