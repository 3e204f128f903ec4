// HTTP request handlers
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use community_engagement::trending::DEFAULT_TOPIC_LIMIT;
use community_engagement::validation::{parse_id, parse_target_id, vote_intent};
use community_shared::types::{
    Comment, CommentNotification, NewComment, NewPost, Post, TargetKind,
};

use super::models::{CreateCommentBody, CreatePostBody, VoteBody, VoteResponse};
use super::session::SessionClaims;
use super::state::AppState;
use crate::ApiError;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Community API is running")
}

/// `GET /targets/{id}`: the post owning the target, without its voters.
pub async fn get_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_target_id(&id)?;
    Ok(Json(state.posts.get_post(id).await?))
}

/// `PATCH /targets/{id}`: applies a like (`increment: 1`) or an unlike
/// (`increment: -1`) and answers with the authoritative count.
///
/// Behind the session guard the `voterId` must be the session subject.
pub async fn vote_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Option<Extension<SessionClaims>>,
    payload: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(body) = payload?;
    if let Some(Extension(claims)) = session {
        if claims.sub != body.voter_id {
            return Err(ApiError::forbidden("voterId does not match the session"));
        }
    }
    let intent = vote_intent(&id, body.increment, &body.voter_id)?;
    let like_count = state.reconciler.apply_intent(&intent).await?;
    Ok(Json(VoteResponse { like_count }))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let id = parse_target_id(&id)?;
    Ok(Json(state.comments.list_comments(id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateCommentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let id = parse_target_id(&id)?;
    let Json(body) = payload?;
    let parent_id = body
        .parent_id
        .as_deref()
        .map(|parent_id| parse_id("parentId", parent_id))
        .transpose()?;

    let comment = state
        .comments
        .add_comment(
            id,
            NewComment {
                parent_id,
                text: body.text,
                author: body.author.into(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /trending`: up to five titles, seeding the store first if it is empty.
pub async fn trending(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.trending.top_topics(DEFAULT_TOPIC_LIMIT).await?))
}

pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list_posts(TargetKind::Blog).await?))
}

pub async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    create_post(&state, TargetKind::Blog, payload).await
}

pub async fn list_forum(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list_posts(TargetKind::Forum).await?))
}

pub async fn create_forum_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    create_post(&state, TargetKind::Forum, payload).await
}

pub async fn list_comment_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommentNotification>>, ApiError> {
    Ok(Json(state.comments.notifications().await?))
}

async fn create_post(
    state: &AppState,
    kind: TargetKind,
    payload: Result<Json<CreatePostBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(body) = payload?;
    let post = state
        .posts
        .create_post(NewPost {
            kind,
            title: body.title,
            preview: body.preview,
            category: body.category,
            body: body.body,
            author: body.author.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}
