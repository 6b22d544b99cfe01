//! Catalog bundle format and record conversion.
//!
//! A bundle is a JSON document in the shape of TMDB list responses:
//! a genre list plus movie and TV records that refer to genres by ID.

use std::collections::HashMap;

use rateit_db::entities::{movie, tv_show};
use sea_orm::Set;
use serde::Deserialize;

/// A genre of the external catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreRecord {
    pub id: i32,
    pub name: String,
}

/// A movie record as delivered by the external catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
}

/// A TV show record as delivered by the external catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct TvShowRecord {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<i32>,
    #[serde(default)]
    pub number_of_episodes: Option<i32>,
    #[serde(default, alias = "creator")]
    pub director: Option<String>,
}

/// A catalog bundle to import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogBundle {
    #[serde(default)]
    pub genres: Vec<GenreRecord>,
    #[serde(default)]
    pub movies: Vec<MovieRecord>,
    #[serde(default, alias = "tvshows", alias = "tvShows")]
    pub tv_shows: Vec<TvShowRecord>,
}

/// Result of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub movies: usize,
    pub tv_shows: usize,
}

/// Genre names by ID, built from one bundle.
#[derive(Debug, Clone, Default)]
pub struct GenreMap {
    names: HashMap<i32, String>,
}

impl GenreMap {
    /// Build the map from a bundle's genre list.
    #[must_use]
    pub fn new(genres: &[GenreRecord]) -> Self {
        Self {
            names: genres.iter().map(|g| (g.id, g.name.clone())).collect(),
        }
    }

    /// Name of the first genre in `ids`. Only the first ID counts.
    #[must_use]
    pub fn first_genre(&self, ids: &[i32]) -> Option<String> {
        ids.first().and_then(|id| self.names.get(id)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Year from an ISO date such as `2010-07-16`.
fn parse_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

/// Absolute poster URL. Relative paths are joined onto `image_base_url`.
fn poster_url(image_base_url: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!(
        "{}/{}",
        image_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl MovieRecord {
    /// Convert into a row for upsert.
    #[must_use]
    pub fn into_active_model(self, genres: &GenreMap, image_base_url: &str) -> movie::ActiveModel {
        movie::ActiveModel {
            id: Set(self.id),
            genre: Set(genres.first_genre(&self.genre_ids)),
            posters: Set(poster_url(image_base_url, self.poster_path.as_deref())),
            popularity: Set(self.popularity),
            rating: Set(self.vote_average),
            release_year: Set(parse_year(self.release_date.as_deref())),
            description: Set(non_blank(self.overview)),
            director: Set(non_blank(self.director)),
            name: Set(self.title),
        }
    }
}

impl TvShowRecord {
    /// Convert into a row for upsert.
    #[must_use]
    pub fn into_active_model(
        self,
        genres: &GenreMap,
        image_base_url: &str,
    ) -> tv_show::ActiveModel {
        tv_show::ActiveModel {
            id: Set(self.id),
            genre: Set(genres.first_genre(&self.genre_ids)),
            posters: Set(poster_url(image_base_url, self.poster_path.as_deref())),
            popularity: Set(self.popularity),
            rating: Set(self.vote_average),
            release_year: Set(parse_year(self.first_air_date.as_deref())),
            seasons: Set(self.number_of_seasons),
            episodes: Set(self.number_of_episodes),
            description: Set(non_blank(self.overview)),
            director: Set(non_blank(self.director)),
            name: Set(self.name),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn genres() -> GenreMap {
        GenreMap::new(&[
            GenreRecord {
                id: 28,
                name: "Action".to_string(),
            },
            GenreRecord {
                id: 18,
                name: "Drama".to_string(),
            },
        ])
    }

    #[test]
    fn test_first_genre_only() {
        let map = genres();
        assert_eq!(map.first_genre(&[18, 28]), Some("Drama".to_string()));
        assert_eq!(map.first_genre(&[99, 28]), None);
        assert_eq!(map.first_genre(&[]), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("2010-07-16")), Some(2010));
        assert_eq!(parse_year(Some("")), None);
        assert_eq!(parse_year(None), None);
    }

    #[test]
    fn test_poster_url() {
        let base = "https://image.tmdb.org/t/p/w500/";
        assert_eq!(
            poster_url(base, Some("/abc.jpg")).unwrap(),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            poster_url(base, Some("https://cdn.example.com/x.jpg")).unwrap(),
            "https://cdn.example.com/x.jpg"
        );
        assert!(poster_url(base, Some("  ")).is_none());
        assert!(poster_url(base, None).is_none());
    }

    #[test]
    fn test_bundle_parses_tmdb_shape() {
        let bundle: CatalogBundle = serde_json::from_str(
            r#"{
                "genres": [{"id": 878, "name": "Science Fiction"}],
                "movies": [{
                    "id": 27205,
                    "title": "Inception",
                    "overview": "Dreams within dreams",
                    "genre_ids": [878, 28],
                    "poster_path": "/inception.jpg",
                    "popularity": 83.9,
                    "vote_average": 8.4,
                    "release_date": "2010-07-15"
                }],
                "tvshows": [{
                    "id": 1399,
                    "name": "Game of Thrones",
                    "genre_ids": [],
                    "first_air_date": "2011-04-17",
                    "number_of_seasons": 8
                }]
            }"#,
        )
        .unwrap();

        let map = GenreMap::new(&bundle.genres);
        let movie = bundle.movies[0]
            .clone()
            .into_active_model(&map, "https://img/");
        assert_eq!(movie.genre, ActiveValue::Set(Some("Science Fiction".to_string())));
        assert_eq!(movie.release_year, ActiveValue::Set(Some(2010)));
        assert_eq!(
            movie.posters,
            ActiveValue::Set(Some("https://img/inception.jpg".to_string()))
        );

        let show = bundle.tv_shows[0]
            .clone()
            .into_active_model(&map, "https://img/");
        assert_eq!(show.genre, ActiveValue::Set(None));
        assert_eq!(show.seasons, ActiveValue::Set(Some(8)));
        assert_eq!(show.description, ActiveValue::Set(None));
    }
}
