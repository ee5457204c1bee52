pub mod comments;
pub mod error;
pub mod likes;
pub mod messages;
pub mod middleware;
pub mod state;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use thoughts_types::api::HealthResponse;

use crate::error::ApiResult;
use crate::state::{AppState, with_db};

/// Build the full HTTP surface. Everything except `/health` sits behind
/// `require_auth`, which is a no-op when no auth secret is configured.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .with_state(state.clone());

    // Static segments (`daily`, `liked`) win over `{id}` in the matcher.
    let protected_routes = Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/messages/daily", get(messages::daily_feed))
        .route("/messages/weekly", get(messages::weekly_feed))
        .route("/messages/monthly", get(messages::monthly_feed))
        .route("/messages/liked/{user_id}", get(messages::liked_by_user))
        .route(
            "/messages/{id}",
            get(messages::messages_by_author)
                .put(messages::update_message)
                .delete(messages::delete_message),
        )
        .route("/messages/{id}/like", post(likes::toggle_like))
        .route("/comments", post(comments::create_comment))
        .route(
            "/comments/message/{message_id}",
            get(comments::comments_for_message),
        )
        .route("/comments/user/{author_id}", get(comments::comments_by_author))
        .route(
            "/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    with_db(&state, |db| db.ping()).await?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
    }))
}
