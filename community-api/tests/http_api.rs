//! HTTP contract tests driving the router over the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use community_api::server::session::SessionClaims;
use community_api::server::{create_app, state::AppState};
use community_repository::{InMemoryStore, PostsRepository};
use community_shared::types::{Author, Post, TargetKind};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

fn make_post(kind: TargetKind, title: &str, like_count: i64, comment_count: i64) -> Post {
    Post {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        preview: "preview".to_string(),
        category: "housing".to_string(),
        body: None,
        author: Author {
            name: "Ana".to_string(),
            avatar: None,
        },
        like_count,
        comment_count,
        created_at: Utc::now(),
    }
}

fn app_with(store: &Arc<InMemoryStore>) -> Router {
    let state = AppState::new(store.clone(), store.clone(), store.clone());
    create_app(state, CorsLayer::new())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app_with(&Arc::new(InMemoryStore::new()));
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vote_scenario() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Forum, "Legacy", 5, 0);
    let uri = format!("/targets/{}", post.id);
    store.insert_post(post, vec![]).await;
    let app = app_with(&store);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"increment": 1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"likeCount": 6}));

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"increment": 1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(body["message"], "already liked");
    assert_eq!(body["likeCount"], 6);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"increment": -1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"likeCount": 5}));

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"increment": -1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "not yet liked");
    assert_eq!(body["likeCount"], 5);
}

#[tokio::test]
async fn test_vote_validation() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Blog, "Guide", 0, 0);
    let uri = format!("/targets/{}", post.id);
    store.insert_post(post, vec![]).await;
    let app = app_with(&store);

    let (status, body) = send(&app, Method::PATCH, "/targets/not-a-uuid", Some(json!({"increment": 1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"increment": 5, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"increment": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed_body");

    let missing = format!("/targets/{}", Uuid::new_v4());
    let (status, body) = send(&app, Method::PATCH, &missing, Some(json!({"increment": 1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_get_target_hides_voters() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Blog, "Guide", 1, 0);
    let uri = format!("/targets/{}", post.id);
    store.insert_post(post, vec!["u1".to_string()]).await;
    let app = app_with(&store);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likeCount"], 1);
    assert_eq!(body["kind"], "blog");
    assert!(body.get("voters").is_none());

    let (status, _) = send(&app, Method::GET, "/targets/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, &format!("/targets/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Blog, "Guide", 0, 0);
    let uri = format!("/targets/{}", post.id);
    store.insert_post(post, vec![]).await;
    let app = app_with(&store);

    store.set_unavailable(true);
    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"increment": 1, "voterId": "u1"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage_error");
}

#[tokio::test]
async fn test_trending_bootstraps_from_forum_posts() {
    let store = Arc::new(InMemoryStore::new());
    for post in [
        make_post(TargetKind::Forum, "A", 10, 1),
        make_post(TargetKind::Forum, "B", 3, 2),
        make_post(TargetKind::Forum, "C", 7, 0),
    ] {
        store.insert_post(post, vec![]).await;
    }
    let app = app_with(&store);

    let (status, body) = send(&app, Method::GET, "/trending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["A", "C", "B"]));
}

#[tokio::test]
async fn test_posts_and_comments_flow() {
    let store = Arc::new(InMemoryStore::new());
    let app = app_with(&store);

    let (status, post) = send(
        &app,
        Method::POST,
        "/forum",
        Some(json!({
            "title": "Landlord won't fix the heating",
            "preview": "It's been three weeks",
            "category": "repairs",
            "author": {"name": "Ana"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["likeCount"], 0);
    assert_eq!(post["commentCount"], 0);
    let id = post["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/forum", Some(json!({"title": "", "preview": "p", "category": "c", "author": {"name": "Ana"}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = send(&app, Method::GET, "/forum", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, blogs) = send(&app, Method::GET, "/blogs", None).await;
    assert!(blogs.as_array().unwrap().is_empty());

    let comments_uri = format!("/targets/{id}/comments");
    let (status, parent) = send(&app, Method::POST, &comments_uri, Some(json!({"text": "Call the council", "author": {"name": "Bo"}}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(parent["author"]["avatar"].is_string());
    let parent_id = parent["id"].as_str().unwrap().to_string();

    let (status, reply) = send(&app, Method::POST, &comments_uri, Some(json!({"text": "Good idea", "author": {"name": "Cy"}, "parentId": parent_id}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["parentId"], parent_id.as_str());

    let (status, _) = send(&app, Method::POST, &comments_uri, Some(json!({"text": "orphan", "author": {"name": "Cy"}, "parentId": Uuid::new_v4()}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, &comments_uri, Some(json!({"text": "   ", "author": {"name": "Cy"}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, &format!("/targets/{}/comments", Uuid::new_v4()), Some(json!({"text": "hi", "author": {"name": "Cy"}}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, comments) = send(&app, Method::GET, &comments_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments.as_array().unwrap().len(), 2);

    let (_, target) = send(&app, Method::GET, &format!("/targets/{id}"), None).await;
    assert_eq!(target["commentCount"], 2);

    let (status, notifications) = send(&app, Method::GET, "/notifications/comments", None).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["commentBody"], "Good idea");
    assert_eq!(notifications[0]["title"], "Landlord won't fix the heating");
}

fn session_cookie(secret: &str, sub: &str) -> String {
    let claims = SessionClaims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();
    format!("token={token}")
}

#[tokio::test]
async fn test_session_guard_on_mutating_routes() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Forum, "Guarded", 0, 0);
    let uri = format!("/targets/{}", post.id);
    store.insert_post(post, vec![]).await;
    let state = AppState::new(store.clone(), store.clone(), store.clone()).with_session_secret("s3cret");
    let app = create_app(state, CorsLayer::new());

    let vote = |cookie: Option<String>| {
        let mut builder = Request::builder()
            .method(Method::PATCH)
            .uri(uri.clone())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
            .body(Body::from(json!({"increment": 1, "voterId": "u1"}).to_string()))
            .unwrap()
    };

    let response = app.clone().oneshot(vote(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(vote(Some(session_cookie("wrong", "u1")))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(vote(Some(session_cookie("s3cret", "u1")))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_subject_must_match_voter() {
    let store = Arc::new(InMemoryStore::new());
    let post = make_post(TargetKind::Forum, "Whose vote", 0, 0);
    let id = post.id;
    let uri = format!("/targets/{id}");
    store.insert_post(post, vec![]).await;
    let state = AppState::new(store.clone(), store.clone(), store.clone()).with_session_secret("s3cret");
    let app = create_app(state, CorsLayer::new());

    let vote = |sub: &str, voter_id: &str| {
        Request::builder()
            .method(Method::PATCH)
            .uri(uri.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, session_cookie("s3cret", sub))
            .body(Body::from(json!({"increment": 1, "voterId": voter_id}).to_string()))
            .unwrap()
    };

    let response = app.clone().oneshot(vote("u1", "u2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(body["error"], "forbidden");

    let response = app.clone().oneshot(vote("u2", "u2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let target = store.find_target(id).await.unwrap().unwrap();
    assert_eq!(target.like_count, 1);
    assert_eq!(target.voters, vec!["u2".to_string()]);
}
