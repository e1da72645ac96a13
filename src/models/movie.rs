use serde::{Deserialize, Serialize};

/// Catalog identifier of a movie (TMDB id)
pub type MovieId = i32;

/// A movie as returned by the catalog service or read from the rating graph.
///
/// Treated as an immutable value object; the catalog collaborator owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub tmdb_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_year: Option<i32>,
}

impl Movie {
    /// Minimal movie with only id and title set
    pub fn new(tmdb_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            tmdb_id,
            title: title.into(),
            overview: None,
            poster_path: None,
            vote_average: None,
            release_year: None,
        }
    }
}
