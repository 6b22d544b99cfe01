//! Movie and TV show catalog endpoints.

use axum::{Json, Router, extract::State, routing::get};
use rateit_common::AppResult;
use rateit_db::entities::{movie, tv_show};
use serde::Serialize;

use crate::{extractors::ApiPath, middleware::AppState};

/// Movie response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: i32,
    pub name: String,
    pub genre: Option<String>,
    pub posters: Option<String>,
    pub popularity: f64,
    pub rating: f64,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub director: Option<String>,
}

impl From<movie::Model> for MovieResponse {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            genre: m.genre,
            posters: m.posters,
            popularity: m.popularity,
            rating: m.rating,
            release_year: m.release_year,
            description: m.description,
            director: m.director,
        }
    }
}

/// TV show response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShowResponse {
    pub id: i32,
    pub name: String,
    pub genre: Option<String>,
    pub posters: Option<String>,
    pub popularity: f64,
    pub rating: f64,
    pub release_year: Option<i32>,
    pub seasons: Option<i32>,
    pub episodes: Option<i32>,
    pub description: Option<String>,
    pub director: Option<String>,
}

impl From<tv_show::Model> for TvShowResponse {
    fn from(s: tv_show::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            genre: s.genre,
            posters: s.posters,
            popularity: s.popularity,
            rating: s.rating,
            release_year: s.release_year,
            seasons: s.seasons,
            episodes: s.episodes,
            description: s.description,
            director: s.director,
        }
    }
}

async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieResponse>>> {
    let movies = state.catalog_service.list_movies().await?;
    Ok(Json(movies.into_iter().map(Into::into).collect()))
}

async fn get_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MovieResponse>> {
    let movie = state.catalog_service.get_movie(id).await?;
    Ok(Json(movie.into()))
}

async fn list_tv_shows(State(state): State<AppState>) -> AppResult<Json<Vec<TvShowResponse>>> {
    let shows = state.catalog_service.list_tv_shows().await?;
    Ok(Json(shows.into_iter().map(Into::into).collect()))
}

async fn get_tv_show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<TvShowResponse>> {
    let show = state.catalog_service.get_tv_show(id).await?;
    Ok(Json(show.into()))
}

/// Movie routes.
pub fn movies_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies))
        .route("/{id}", get(get_movie))
}

/// TV show routes.
pub fn tv_shows_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tv_shows))
        .route("/{id}", get(get_tv_show))
}
