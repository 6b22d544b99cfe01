//! Recommendation endpoints.

use axum::{Json, Router, extract::State, routing::get};
use rateit_common::AppResult;
use rateit_core::Recommendations;
use serde::Serialize;

use super::catalog::{MovieResponse, TvShowResponse};
use crate::{extractors::ApiPath, middleware::AppState};

/// Recommended content for one user.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub movies: Vec<MovieResponse>,
    pub tvshows: Vec<TvShowResponse>,
}

impl From<Recommendations> for RecommendationsResponse {
    fn from(recs: Recommendations) -> Self {
        Self {
            movies: recs.movies.into_iter().map(Into::into).collect(),
            tvshows: recs.tv_shows.into_iter().map(Into::into).collect(),
        }
    }
}

async fn recommend(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<RecommendationsResponse>> {
    let recs = state.recommendation_service.recommend(&username).await?;
    Ok(Json(recs.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{username}", get(recommend))
}
