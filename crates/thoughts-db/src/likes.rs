use chrono::{DateTime, Utc};
use rusqlite::{TransactionBehavior, params};
use thoughts_types::models::Message;
use tracing::debug;

use crate::messages::load_message;
use crate::{Database, Result, StoreError, format_timestamp, require};

impl Database {
    /// Toggle `author_id` in the message's voter set: removes it if present,
    /// adds it otherwise. The membership change, the recount of `like_count`
    /// and the `updated_at` bump commit together in one IMMEDIATE
    /// transaction, so concurrent toggles cannot lose an update.
    pub fn toggle_like(&self, message_id: &str, author_id: &str, now: DateTime<Utc>) -> Result<Message> {
        require("authorId", author_id)?;
        let ts = format_timestamp(now);

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM messages WHERE id = ?1)",
                [message_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::message_not_found(message_id));
            }

            let removed = tx.execute(
                "DELETE FROM message_likes WHERE message_id = ?1 AND author_id = ?2",
                params![message_id, author_id],
            )?;
            if removed == 0 {
                tx.execute(
                    "INSERT INTO message_likes (message_id, author_id, created_at) VALUES (?1, ?2, ?3)",
                    params![message_id, author_id, ts],
                )?;
            }

            tx.execute(
                "UPDATE messages
                 SET like_count = (SELECT COUNT(*) FROM message_likes WHERE message_id = ?1),
                     updated_at = ?2
                 WHERE id = ?1",
                params![message_id, ts],
            )?;

            let message = load_message(&tx, message_id)?;
            tx.commit()?;

            debug!(
                "{} {} message {} (now {} likes)",
                author_id,
                if removed == 0 { "liked" } else { "unliked" },
                message_id,
                message.like_count
            );
            Ok(message)
        })
    }
}
