use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Movie, MovieId};

/// Body of `POST /api/recommendations/share`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub tmdb_id: MovieId,
    pub recipient_username: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A shared-recommendation edge as read from the rating graph
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRecord {
    pub movie: Movie,
    pub from_username: String,
    pub to_username: String,
    pub message: Option<String>,
    pub shared_at: DateTime<Utc>,
}

/// A recommendation someone shared with the current user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedShare {
    pub tmdb_id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_year: Option<i32>,
    pub from_username: String,
    pub message: Option<String>,
    pub shared_at: DateTime<Utc>,
}

/// A recommendation the current user shared with someone else
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentShare {
    pub tmdb_id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_year: Option<i32>,
    pub to_username: String,
    pub message: Option<String>,
    pub shared_at: DateTime<Utc>,
}

impl From<ShareRecord> for ReceivedShare {
    fn from(record: ShareRecord) -> Self {
        let movie = record.movie;
        Self {
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            poster_path: movie.poster_path,
            overview: movie.overview,
            vote_average: movie.vote_average,
            release_year: movie.release_year,
            from_username: record.from_username,
            message: record.message,
            shared_at: record.shared_at,
        }
    }
}

impl From<ShareRecord> for SentShare {
    fn from(record: ShareRecord) -> Self {
        let movie = record.movie;
        Self {
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            poster_path: movie.poster_path,
            overview: movie.overview,
            vote_average: movie.vote_average,
            release_year: movie.release_year,
            to_username: record.to_username,
            message: record.message,
            shared_at: record.shared_at,
        }
    }
}
