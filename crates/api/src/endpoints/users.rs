//! User endpoints.

use axum::{Json, Router, extract::State, routing::get};
use rateit_common::AppResult;
use rateit_db::entities::user::{self, AccountType};
use serde::Serialize;

use crate::{extractors::ApiPath, middleware::AppState};

/// Public profile of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub pfp: Option<String>,
    pub account_type: AccountType,
    pub post_count: i32,
}

impl From<user::Model> for UserProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            username: user.username,
            email: user.email,
            bio: user.bio,
            pfp: user.pfp,
            account_type: user.account_type,
            post_count: user.post_count,
        }
    }
}

/// Entry in user listings.
#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub username: String,
    pub email: String,
    pub pfp: Option<String>,
    pub bio: Option<String>,
}

impl From<user::Model> for UserSummaryResponse {
    fn from(user: user::Model) -> Self {
        Self {
            username: user.username,
            email: user.email,
            pfp: user.pfp,
            bio: user.bio,
        }
    }
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserSummaryResponse>>> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<UserProfileResponse>> {
    let user = state.user_service.get(&username).await?;
    Ok(Json(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{username}", get(show))
}
