use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thoughts_types::models::Comment;
use tracing::debug;
use uuid::Uuid;

use crate::models::{COMMENT_COLUMNS, CommentRow};
use crate::{Database, Result, StoreError, format_timestamp, require};

impl Database {
    /// Insert a comment. `message_id` is stored as given and never checked
    /// against the messages table.
    pub fn create_comment(
        &self,
        message_id: &str,
        author_id: &str,
        author_display_name: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        require("messageId", message_id)?;
        require("authorId", author_id)?;
        require("authorDisplayName", author_display_name)?;
        require("text", text)?;

        let id = Uuid::new_v4().to_string();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, message_id, author_id, author_display_name, text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, message_id, author_id, author_display_name, text, format_timestamp(now)],
            )?;
            debug!("Created comment {} on message {}", id, message_id);
            load_comment(conn, &id)
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Comment> {
        self.with_conn(|conn| load_comment(conn, id))
    }

    /// Comments on a message in the order they were written.
    pub fn get_comments_for_message(&self, message_id: &str) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            query_comments(
                conn,
                "WHERE message_id = ?1 ORDER BY created_at ASC, id ASC",
                message_id,
            )
        })
    }

    /// A user's comments, newest first.
    pub fn get_comments_by_author(&self, author_id: &str) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            query_comments(
                conn,
                "WHERE author_id = ?1 ORDER BY created_at DESC, id DESC",
                author_id,
            )
        })
    }

    pub fn update_comment(&self, id: &str, text: &str) -> Result<Comment> {
        require("text", text)?;

        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE comments SET text = ?1 WHERE id = ?2", params![text, id])?;
            if changed == 0 {
                return Err(StoreError::comment_not_found(id));
            }
            load_comment(conn, id)
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<Comment> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let comment = load_comment(&tx, id)?;
            tx.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            tx.commit()?;
            debug!("Deleted comment {}", id);
            Ok(comment)
        })
    }
}

fn load_comment(conn: &Connection, id: &str) -> Result<Comment> {
    let sql = format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS);
    conn.query_row(&sql, [id], CommentRow::from_row)
        .optional()?
        .ok_or_else(|| StoreError::comment_not_found(id))?
        .try_into()
}

fn query_comments(conn: &Connection, clause: &str, key: &str) -> Result<Vec<Comment>> {
    let sql = format!("SELECT {} FROM comments {}", COMMENT_COLUMNS, clause);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([key], CommentRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(Comment::try_from).collect()
}
