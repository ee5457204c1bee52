use std::net::SocketAddr;

use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use thoughts_api::router;
use thoughts_api::state::AppStateInner;
use thoughts_db::Database;
use thoughts_types::api::Claims;

const SECRET: &str = "test-secret";

/// Serve a fresh in-memory store on an ephemeral port.
async fn spawn_app(auth_secret: Option<&str>) -> String {
    let db = Database::open_in_memory().unwrap();
    let state = AppStateInner::new(db, auth_secret.map(str::to_string));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn post_message(client: &reqwest::Client, base: &str, author: &str, text: &str) -> Value {
    let resp = client
        .post(format!("{}/messages", base))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "text": text,
            "authorId": author,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

fn token(sub: &str, valid_for: chrono::Duration) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now() + valid_for).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_create_and_list_messages() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();

    let created = post_message(&client, &base, "u1", "first thought").await;
    assert_eq!(created["text"], "first thought");
    assert_eq!(created["authorId"], "u1");
    assert_eq!(created["likeCount"], 0);
    assert_eq!(created["likedBy"], json!([]));
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    post_message(&client, &base, "u2", "second thought").await;

    let all: Vec<Value> = client
        .get(format!("{}/messages", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let mine: Vec<Value> = client
        .get(format!("{}/messages/u1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_windowed_feeds_include_fresh_messages() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();
    post_message(&client, &base, "u1", "just now").await;

    for window in ["daily", "weekly", "monthly"] {
        let resp = client
            .get(format!("{}/messages/{}", base, window))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let feed: Vec<Value> = resp.json().await.unwrap();
        assert_eq!(feed.len(), 1, "{} feed", window);
        assert_eq!(feed[0]["text"], "just now");
    }
}

#[tokio::test]
async fn test_validation_and_malformed_bodies() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/messages", base))
        .json(&json!({ "firstName": "Ada", "lastName": "L", "text": "", "authorId": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "text is required");

    // Missing field
    let resp = client
        .post(format!("{}/messages", base))
        .json(&json!({ "firstName": "Ada", "text": "hi", "authorId": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let resp = client
        .post(format!("{}/comments", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_message() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();
    let created = post_message(&client, &base, "u1", "draft").await;
    let id = created["id"].as_str().unwrap();

    let resp = client
        .put(format!("{}/messages/{}", base, id))
        .json(&json!({ "text": "final" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["text"], "final");
    assert_eq!(updated["firstName"], "Ada");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let resp = client
        .delete(format!("{}/messages/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["id"], id);

    let resp = client
        .put(format!("{}/messages/{}", base, id))
        .json(&json!({ "text": "too late" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let resp = client
        .delete(format!("{}/messages/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggle_over_http() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();
    let created = post_message(&client, &base, "author", "like me").await;
    let id = created["id"].as_str().unwrap();
    let url = format!("{}/messages/{}/like", base, id);

    let toggle = |author: &'static str| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let resp = client
                .post(url)
                .json(&json!({ "authorId": author }))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            resp.json::<Value>().await.unwrap()
        }
    };

    let m = toggle("u1").await;
    assert_eq!(m["likeCount"], 1);
    assert_eq!(m["likedBy"], json!(["u1"]));

    let m = toggle("u2").await;
    assert_eq!(m["likeCount"], 2);

    let m = toggle("u1").await;
    assert_eq!(m["likeCount"], 1);
    assert_eq!(m["likedBy"], json!(["u2"]));

    let liked: Vec<Value> = client
        .get(format!("{}/messages/liked/u2", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["id"], id);

    let resp = client
        .post(format!("{}/messages/missing/like", base))
        .json(&json!({ "authorId": "u1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let base = spawn_app(None).await;
    let client = reqwest::Client::new();
    let message = post_message(&client, &base, "author", "discuss").await;
    let message_id = message["id"].as_str().unwrap();

    let resp = client
        .post(format!("{}/comments", base))
        .json(&json!({
            "messageId": message_id,
            "authorId": "u9",
            "text": "agreed",
            "authorDisplayName": "Grace",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = resp.json().await.unwrap();
    assert_eq!(comment["authorDisplayName"], "Grace");
    let comment_id = comment["id"].as_str().unwrap();

    let thread: Vec<Value> = client
        .get(format!("{}/comments/message/{}", base, message_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(thread.len(), 1);

    let resp = client
        .put(format!("{}/comments/{}", base, comment_id))
        .json(&json!({ "text": "strongly agreed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let by_user: Vec<Value> = client
        .get(format!("{}/comments/user/u9", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0]["text"], "strongly agreed");

    let resp = client
        .delete(format!("{}/comments/{}", base, comment_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{}/comments/{}", base, comment_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_when_secret_configured() {
    let base = spawn_app(Some(SECRET)).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get(format!("{}/messages", base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let resp = client
        .get(format!("{}/messages", base))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{}/messages", base))
        .bearer_auth(token("u1", chrono::Duration::hours(1)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/messages", base))
        .bearer_auth(token("u1", chrono::Duration::hours(-2)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_tokens_with_extra_claims_are_accepted() {
    let base = spawn_app(Some(SECRET)).await;
    let client = reqwest::Client::new();

    let bridged = encode(
        &Header::default(),
        &json!({
            "sub": "u1",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "exp": (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let resp = client
        .post(format!("{}/messages", base))
        .bearer_auth(bridged)
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "text": "signed in",
            "authorId": "u1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}
