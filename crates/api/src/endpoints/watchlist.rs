//! Watchlist endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use rateit_common::AppResult;
use rateit_core::{AddToWatchlistInput, ContentRef, WatchlistItem};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, ApiPath},
    middleware::AppState,
    response::{CountResponse, MessageResponse},
};

/// Result of adding to a watchlist.
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub message: String,
    /// `false` when the content was already listed.
    pub added: bool,
}

async fn list(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    Ok(Json(state.watchlist_service.list(&username).await?))
}

async fn count(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<CountResponse>> {
    let count = state.watchlist_service.count(&username).await?;
    Ok(Json(CountResponse { count }))
}

async fn add(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddToWatchlistInput>,
) -> AppResult<Json<AddedResponse>> {
    let added = state.watchlist_service.add(input).await?;
    let message = if added {
        "Added to watchlist"
    } else {
        "Already in watchlist"
    };
    Ok(Json(AddedResponse {
        message: message.to_string(),
        added,
    }))
}

async fn remove_movie(
    State(state): State<AppState>,
    ApiPath((username, movie_id)): ApiPath<(String, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .watchlist_service
        .remove(&username, ContentRef::Movie(movie_id))
        .await?;
    Ok(Json(MessageResponse::new("Movie removed from watchlist")))
}

async fn remove_tv_show(
    State(state): State<AppState>,
    ApiPath((username, tv_show_id)): ApiPath<(String, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .watchlist_service
        .remove(&username, ContentRef::TvShow(tv_show_id))
        .await?;
    Ok(Json(MessageResponse::new("TV show removed from watchlist")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/movie/{username}/{movie_id}", delete(remove_movie))
        .route("/tvshow/{username}/{tv_show_id}", delete(remove_tv_show))
        .route("/{username}", get(list))
        .route("/{username}/count", get(count))
}
