//! API endpoints.

mod auth;
mod catalog;
mod comments;
mod friends;
mod health;
mod posts;
mod recommendations;
mod users;
mod watchlist;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router. The server mounts it under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(health::router())
        .nest("/movies", catalog::movies_router())
        .nest("/tvshows", catalog::tv_shows_router())
        .nest("/users", users::router())
        .nest("/friends", friends::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/watchlist", watchlist::router())
        .nest("/recommendations", recommendations::router())
}
