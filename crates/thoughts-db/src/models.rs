//! Database row types. These map directly to SQLite rows and are converted
//! into `thoughts_types::models` once timestamps have been parsed.

use rusqlite::Row;
use thoughts_types::models::{Comment, Message};

use crate::{Result, StoreError, parse_timestamp};

pub(crate) const MESSAGE_COLUMNS: &str =
    "id, first_name, last_name, text, author_id, like_count, created_at, updated_at";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, message_id, author_id, author_display_name, text, created_at";

pub struct MessageRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub text: String,
    pub author_id: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl MessageRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            text: row.get(3)?,
            author_id: row.get(4)?,
            like_count: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    pub fn into_message(self, liked_by: Vec<String>) -> Result<Message> {
        let like_count = u32::try_from(self.like_count).map_err(|_| {
            StoreError::Corrupt(format!(
                "like_count {} on message '{}'",
                self.like_count, self.id
            ))
        })?;

        Ok(Message {
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            text: self.text,
            author_id: self.author_id,
            like_count,
            liked_by,
        })
    }
}

pub struct LikeRow {
    pub message_id: String,
    pub author_id: String,
}

pub struct CommentRow {
    pub id: String,
    pub message_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub text: String,
    pub created_at: String,
}

impl CommentRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            message_id: row.get(1)?,
            author_id: row.get(2)?,
            author_display_name: row.get(3)?,
            text: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = StoreError;

    fn try_from(row: CommentRow) -> Result<Self> {
        Ok(Comment {
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
            message_id: row.message_id,
            author_id: row.author_id,
            author_display_name: row.author_display_name,
            text: row.text,
        })
    }
}
