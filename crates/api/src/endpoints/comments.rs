//! Comment endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, post},
};
use rateit_common::AppResult;
use rateit_db::entities::comment;
use serde::Serialize;

use super::posts::UsernameRequest;
use crate::{
    extractors::{ApiPath, ValidatedJson},
    middleware::AppState,
    response::{MessageResponse, VoteResponse},
};

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: i32,
    pub post_id: i32,
    pub username: String,
    pub comment_text: String,
    pub date_of_comment: String,
    pub upvote_count: i32,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            comment_id: c.id,
            post_id: c.post_id,
            username: c.username,
            comment_text: c.comment_text,
            date_of_comment: c.date_of_comment.to_rfc3339(),
            upvote_count: c.upvote_count,
        }
    }
}

/// Delete a comment. Only its author may do so.
async fn remove(
    State(state): State<AppState>,
    ApiPath(comment_id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UsernameRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .comment_service
        .delete(comment_id, &req.username)
        .await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

async fn upvote(
    State(state): State<AppState>,
    ApiPath(comment_id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UsernameRequest>,
) -> AppResult<Json<VoteResponse>> {
    let tally = state
        .vote_service
        .upvote_comment(comment_id, &req.username)
        .await?;
    Ok(Json(tally.into()))
}

async fn remove_upvote(
    State(state): State<AppState>,
    ApiPath(comment_id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UsernameRequest>,
) -> AppResult<Json<VoteResponse>> {
    let tally = state
        .vote_service
        .remove_comment_upvote(comment_id, &req.username)
        .await?;
    Ok(Json(tally.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{comment_id}", delete(remove))
        .route("/{comment_id}/upvote", post(upvote))
        .route("/{comment_id}/removeupvote", post(remove_upvote))
}
