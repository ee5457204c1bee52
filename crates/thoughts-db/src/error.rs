use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("DB lock poisoned: {0}")]
    Poisoned(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn message_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Message",
            id: id.to_string(),
        }
    }

    pub(crate) fn comment_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Comment",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
