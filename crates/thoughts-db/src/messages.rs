use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Params, params};
use thoughts_types::models::Message;
use tracing::debug;
use uuid::Uuid;

use crate::models::{LikeRow, MESSAGE_COLUMNS, MessageRow};
use crate::{Database, Result, StoreError, format_timestamp, require};

/// Upper bound on bound parameters per voter-set lookup.
const LIKES_BATCH: usize = 500;

impl Database {
    pub fn create_message(
        &self,
        first_name: &str,
        last_name: &str,
        text: &str,
        author_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Message> {
        require("firstName", first_name)?;
        require("lastName", last_name)?;
        require("text", text)?;
        require("authorId", author_id)?;

        let id = Uuid::new_v4().to_string();
        let ts = format_timestamp(now);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, first_name, last_name, text, author_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![id, first_name, last_name, text, author_id, ts],
            )?;
            debug!("Created message {} by {}", id, author_id);
            load_message(conn, &id)
        })
    }

    /// Every message, newest first.
    pub fn get_all_messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| load_messages(conn, "", params![]))
    }

    pub fn get_messages_by_author(&self, author_id: &str) -> Result<Vec<Message>> {
        self.with_conn(|conn| load_messages(conn, "WHERE author_id = ?1", [author_id]))
    }

    pub fn get_message(&self, id: &str) -> Result<Message> {
        self.with_conn(|conn| load_message(conn, id))
    }

    /// Replace the text of a message. Names and likes are left alone.
    pub fn update_message(&self, id: &str, text: &str, now: DateTime<Utc>) -> Result<Message> {
        require("text", text)?;

        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET text = ?1, updated_at = ?2 WHERE id = ?3",
                params![text, format_timestamp(now), id],
            )?;
            if changed == 0 {
                return Err(StoreError::message_not_found(id));
            }
            load_message(conn, id)
        })
    }

    /// Delete a message and its voter set, returning what was removed.
    /// Comments pointing at it are kept.
    pub fn delete_message(&self, id: &str) -> Result<Message> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let message = load_message(&tx, id)?;
            tx.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            tx.commit()?;
            debug!("Deleted message {}", id);
            Ok(message)
        })
    }

    /// Messages with `created_at >= window_start`, newest first.
    pub fn get_messages_since(&self, window_start: DateTime<Utc>) -> Result<Vec<Message>> {
        // Stored timestamps have millisecond precision, so round the bound up
        // or a row just before a sub-millisecond start would compare equal.
        let start = format_timestamp(ceil_to_millis(window_start));
        self.with_conn(|conn| load_messages(conn, "WHERE created_at >= ?1", [start]))
    }

    /// Messages whose voter set contains `author_id`.
    pub fn get_liked_messages(&self, author_id: &str) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            load_messages(
                conn,
                "WHERE id IN (SELECT message_id FROM message_likes WHERE author_id = ?1)",
                [author_id],
            )
        })
    }
}

fn ceil_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let sub_millis = ts.timestamp_subsec_nanos() % 1_000_000;
    if sub_millis == 0 {
        ts
    } else {
        ts + Duration::nanoseconds(i64::from(1_000_000 - sub_millis))
    }
}

pub(crate) fn load_message(conn: &Connection, id: &str) -> Result<Message> {
    let sql = format!("SELECT {} FROM messages WHERE id = ?1", MESSAGE_COLUMNS);
    let row = conn
        .query_row(&sql, [id], MessageRow::from_row)
        .optional()?
        .ok_or_else(|| StoreError::message_not_found(id))?;

    let mut stmt =
        conn.prepare("SELECT author_id FROM message_likes WHERE message_id = ?1 ORDER BY author_id")?;
    let liked_by = stmt
        .query_map([id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    row.into_message(liked_by)
}

fn load_messages<P: Params>(conn: &Connection, filter: &str, params: P) -> Result<Vec<Message>> {
    let sql = format!(
        "SELECT {} FROM messages {} ORDER BY created_at DESC, id DESC",
        MESSAGE_COLUMNS, filter
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, MessageRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    let mut likes = likes_for_messages(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let liked_by = likes.remove(&row.id).unwrap_or_default();
            row.into_message(liked_by)
        })
        .collect()
}

/// Batch-fetch voter sets, grouped by message id.
fn likes_for_messages(conn: &Connection, ids: &[&str]) -> Result<HashMap<String, Vec<String>>> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();

    for chunk in ids.chunks(LIKES_BATCH) {
        let placeholders: Vec<String> = (1..=chunk.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT message_id, author_id FROM message_likes WHERE message_id IN ({}) ORDER BY author_id",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(chunk.iter()), |row| {
                Ok(LikeRow {
                    message_id: row.get(0)?,
                    author_id: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for like in rows {
            grouped.entry(like.message_id).or_default().push(like.author_id);
        }
    }

    Ok(grouped)
}
