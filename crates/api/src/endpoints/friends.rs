//! Friend endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use rateit_common::AppResult;
use serde::Deserialize;
use validator::Validate;

use super::users::UserSummaryResponse;
use crate::{
    extractors::{ApiPath, ValidatedJson},
    middleware::AppState,
    response::MessageResponse,
};

/// Friend add/remove request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 64))]
    pub friend_username: String,
}

async fn add(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FriendRequest>,
) -> AppResult<Json<MessageResponse>> {
    let created = state
        .friend_service
        .add_friend(&req.username, &req.friend_username)
        .await?;

    let message = if created {
        "Friend added successfully"
    } else {
        "Already friends"
    };
    Ok(Json(MessageResponse::new(message)))
}

async fn remove(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FriendRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .friend_service
        .remove_friend(&req.username, &req.friend_username)
        .await?;
    Ok(Json(MessageResponse::new("Friend removed successfully")))
}

async fn list(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<Vec<UserSummaryResponse>>> {
    let friends = state.friend_service.list_friends(&username).await?;
    Ok(Json(friends.into_iter().map(Into::into).collect()))
}

async fn mutual(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<Vec<UserSummaryResponse>>> {
    let friends = state.friend_service.list_mutual_friends(&username).await?;
    Ok(Json(friends.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/remove", delete(remove))
        .route("/{username}", get(list))
        .route("/{username}/mutual", get(mutual))
}
