use std::sync::Arc;

use tracing::error;

use thoughts_db::Database;

use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// HS256 secret for bearer tokens. `None` leaves the API open.
    pub auth_secret: Option<String>,
}

impl AppStateInner {
    pub fn new(db: Database, auth_secret: Option<String>) -> AppState {
        Arc::new(Self { db, auth_secret })
    }
}

/// Run a store call on the blocking pool.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> thoughts_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Store("internal error".into())
        })?
        .map_err(ApiError::from)
}
