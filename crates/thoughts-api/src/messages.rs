use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use thoughts_types::api::{CreateMessageRequest, UpdateMessageRequest};
use thoughts_types::feed::FeedWindow;
use thoughts_types::models::Message;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

/// GET /messages
pub async fn list_messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    let messages = with_db(&state, |db| db.get_all_messages()).await?;
    Ok(Json(messages))
}

/// GET /messages/{id}, where `id` is an author id
pub async fn messages_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = with_db(&state, move |db| db.get_messages_by_author(&user_id)).await?;
    Ok(Json(messages))
}

/// GET /messages/liked/{user_id}
pub async fn liked_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = with_db(&state, move |db| db.get_liked_messages(&user_id)).await?;
    Ok(Json(messages))
}

pub async fn daily_feed(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    feed(state, FeedWindow::Daily).await
}

pub async fn weekly_feed(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    feed(state, FeedWindow::Weekly).await
}

pub async fn monthly_feed(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    feed(state, FeedWindow::Monthly).await
}

async fn feed(state: AppState, window: FeedWindow) -> ApiResult<Json<Vec<Message>>> {
    let start = window.start(Utc::now());
    let messages = with_db(&state, move |db| db.get_messages_since(start)).await?;
    tracing::debug!("{} feed: {} messages since {}", window.as_str(), messages.len(), start);
    Ok(Json(messages))
}

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateMessageRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let message = with_db(&state, move |db| {
        db.create_message(&req.first_name, &req.last_name, &req.text, &req.author_id, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /messages/{id}
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateMessageRequest>, ApiError>,
) -> ApiResult<Json<Message>> {
    let message = with_db(&state, move |db| db.update_message(&id, &req.text, Utc::now())).await?;
    Ok(Json(message))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let message = with_db(&state, move |db| db.delete_message(&id)).await?;
    Ok(Json(message))
}
