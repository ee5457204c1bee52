use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use thoughts_types::api::{CreateCommentRequest, UpdateCommentRequest};
use thoughts_types::models::Comment;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

pub async fn create_comment(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateCommentRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let comment = with_db(&state, move |db| {
        db.create_comment(
            &req.message_id,
            &req.author_id,
            &req.author_display_name,
            &req.text,
            Utc::now(),
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn comments_for_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = with_db(&state, move |db| db.get_comments_for_message(&message_id)).await?;
    Ok(Json(comments))
}

pub async fn comments_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = with_db(&state, move |db| db.get_comments_by_author(&author_id)).await?;
    Ok(Json(comments))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateCommentRequest>, ApiError>,
) -> ApiResult<Json<Comment>> {
    let comment = with_db(&state, move |db| db.update_comment(&id, &req.text)).await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Comment>> {
    let comment = with_db(&state, move |db| db.delete_comment(&id)).await?;
    Ok(Json(comment))
}
