use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use thoughts_types::api::ToggleLikeRequest;
use thoughts_types::models::Message;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

/// POST /messages/{id}/like
///
/// Likes the message for `authorId`, or unlikes it if they already do.
/// Responds with the updated message.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<ToggleLikeRequest>, ApiError>,
) -> ApiResult<Json<Message>> {
    let message = with_db(&state, move |db| {
        db.toggle_like(&message_id, &req.author_id, Utc::now())
    })
    .await?;

    Ok(Json(message))
}
