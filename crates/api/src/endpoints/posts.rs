//! Post endpoints, including a post's votes and comments.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use rateit_common::AppResult;
use rateit_core::{CreateCommentInput, CreatePostInput, PostWithTags};
use rateit_db::repositories::PostFilter;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::comments::CommentResponse;
use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, ValidatedJson},
    middleware::AppState,
    response::{MessageResponse, VoteResponse},
};

/// Post response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: i32,
    pub username: String,
    pub title: String,
    pub content_text: String,
    pub date_of_post: String,
    pub movie_id: Option<i32>,
    pub tv_show_id: Option<i32>,
    pub poll_id: Option<i32>,
    pub tags: Vec<String>,
    pub upvote_count: i32,
    pub comment_count: i32,
}

impl From<PostWithTags> for PostResponse {
    fn from(PostWithTags { post, tags }: PostWithTags) -> Self {
        Self {
            post_id: post.id,
            username: post.username,
            title: post.title,
            content_text: post.content_text,
            date_of_post: post.date_of_post.to_rfc3339(),
            movie_id: post.movie_id,
            tv_show_id: post.tv_show_id,
            poll_id: post.poll_id,
            tags,
            upvote_count: post.upvote_count,
            comment_count: post.comment_count,
        }
    }
}

/// Created post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostResponse {
    pub post_id: i32,
}

/// Post listing filters. All are optional and combine with AND.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSearchQuery {
    pub search_term: Option<String>,
    pub username: Option<String>,
    #[serde(alias = "movieID")]
    pub movie_id: Option<i32>,
    #[serde(alias = "tvShowID")]
    pub tv_show_id: Option<i32>,
    pub tag: Option<String>,
}

impl From<PostSearchQuery> for PostFilter {
    fn from(q: PostSearchQuery) -> Self {
        Self {
            search_term: q.search_term,
            username: q.username,
            movie_id: q.movie_id,
            tv_show_id: q.tv_show_id,
            tag: q.tag,
        }
    }
}

/// Request identifying the acting user.
#[derive(Debug, Deserialize, Validate)]
pub struct UsernameRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

/// Comment listing options.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub sort_by: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostSearchQuery>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.post_service.search(query.into()).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> AppResult<(StatusCode, Json<CreatedPostResponse>)> {
    let created = state.post_service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedPostResponse {
            post_id: created.post.id,
        }),
    ))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.get(post_id).await?;
    Ok(Json(post.into()))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.post_service.delete(post_id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

async fn upvote(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UsernameRequest>,
) -> AppResult<Json<VoteResponse>> {
    let tally = state
        .vote_service
        .upvote_post(post_id, &req.username)
        .await?;
    Ok(Json(tally.into()))
}

async fn remove_upvote(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
    ValidatedJson(req): ValidatedJson<UsernameRequest>,
) -> AppResult<Json<VoteResponse>> {
    let tally = state
        .vote_service
        .remove_post_upvote(post_id, &req.username)
        .await?;
    Ok(Json(tally.into()))
}

async fn list_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<CommentListQuery>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list(post_id, query.sort_by.as_deref())
        .await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

async fn create_comment(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i32>,
    ApiJson(input): ApiJson<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state.comment_service.create(post_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{post_id}", get(show).delete(delete))
        .route("/{post_id}/upvote", post(upvote))
        .route("/{post_id}/removeupvote", post(remove_upvote))
        .route(
            "/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
}
