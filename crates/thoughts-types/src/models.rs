use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A posted thought. `like_count` always equals `liked_by.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: u32,
    /// Sorted, no duplicates.
    pub liked_by: Vec<String>,
}

impl Message {
    pub fn is_liked_by(&self, author_id: &str) -> bool {
        self.liked_by.iter().any(|id| id == author_id)
    }
}

/// A comment on a message. `message_id` is not checked against existing
/// messages, so a comment can outlive the message it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub message_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
