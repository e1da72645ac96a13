use serde::{Serialize, Serializer};
use std::fmt::Display;

use super::{Movie, MovieId};

/// Why a movie was recommended; closed set, serialized as the human-readable tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationReason {
    SimilarUsers,
    SimilarToFavorite,
    Trending,
}

impl RecommendationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationReason::SimilarUsers => "Popular with similar users",
            RecommendationReason::SimilarToFavorite => "Similar to your favorite movie",
            RecommendationReason::Trending => "Trending now",
        }
    }
}

impl Display for RecommendationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecommendationReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A collaborative-filtering hit as read from the rating graph
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub movie: Movie,
    /// Distinct similar users who rated the movie highly
    pub recommenders: i64,
    /// Average score among those recommenders
    pub average_score: f64,
}

/// A recommended movie returned to the caller; never persisted
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub tmdb_id: MovieId,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_year: Option<i32>,
    pub reason: RecommendationReason,
}

impl Recommendation {
    pub fn from_movie(movie: Movie, reason: RecommendationReason) -> Self {
        Self {
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            overview: movie.overview,
            poster_path: movie.poster_path,
            vote_average: movie.vote_average,
            release_year: movie.release_year,
            reason,
        }
    }
}
