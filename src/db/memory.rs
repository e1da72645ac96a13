use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::{
    db::graph::{GraphStore, COLLABORATIVE_LIMIT, LIKED_SCORE},
    error::{AppError, AppResult},
    models::{Movie, MovieId, RawCandidate, ShareRecord},
};

struct Rating {
    user_id: String,
    tmdb_id: MovieId,
    score: i16,
    rated_at: DateTime<Utc>,
}

struct ShareEdge {
    from_user_id: String,
    to_user_id: String,
    tmdb_id: MovieId,
    message: Option<String>,
    shared_at: DateTime<Utc>,
}

#[derive(Default)]
struct GraphData {
    /// user id → username
    users: HashMap<String, String>,
    movies: HashMap<MovieId, Movie>,
    ratings: Vec<Rating>,
    shares: Vec<ShareEdge>,
}

impl GraphData {
    fn user_id_for(&self, username: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|(_, name)| name.as_str() == username)
            .map(|(id, _)| id.as_str())
    }

    fn share_exists(&self, sender_id: &str, recipient_username: &str, tmdb_id: MovieId) -> bool {
        let Some(recipient_id) = self.user_id_for(recipient_username) else {
            return false;
        };
        self.shares.iter().any(|s| {
            s.from_user_id == sender_id && s.to_user_id == recipient_id && s.tmdb_id == tmdb_id
        })
    }

    /// Share records matching `filter`, newest first; later inserts win ties
    fn share_records(&self, filter: impl Fn(&ShareEdge) -> bool) -> Vec<ShareRecord> {
        let mut records: Vec<ShareRecord> = self
            .shares
            .iter()
            .rev()
            .filter(|edge| filter(*edge))
            .filter_map(|edge| {
                Some(ShareRecord {
                    movie: self.movies.get(&edge.tmdb_id)?.clone(),
                    from_username: self.users.get(&edge.from_user_id)?.clone(),
                    to_username: self.users.get(&edge.to_user_id)?.clone(),
                    message: edge.message.clone(),
                    shared_at: edge.shared_at,
                })
            })
            .collect();
        records.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));
        records
    }
}

/// Rating graph held in process memory
///
/// Mirrors the PostgreSQL store's semantics, including collaborative ranking
/// and the duplicate-share re-check. Used by the unit and router-level tests;
/// the server binary always runs on PostgreSQL.
#[derive(Default)]
pub struct InMemoryGraph {
    inner: RwLock<GraphData>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user_id: &str, username: &str) {
        let mut data = self.inner.write().await;
        data.users.insert(user_id.to_string(), username.to_string());
    }

    pub async fn add_movie(&self, movie: Movie) {
        let mut data = self.inner.write().await;
        data.movies.insert(movie.tmdb_id, movie);
    }

    /// Upserts a rating stamped with the current time
    pub async fn rate(&self, user_id: &str, tmdb_id: MovieId, score: i16) {
        self.rate_at(user_id, tmdb_id, score, Utc::now()).await;
    }

    /// Upserts a rating; at most one rating exists per (user, movie)
    pub async fn rate_at(
        &self,
        user_id: &str,
        tmdb_id: MovieId,
        score: i16,
        rated_at: DateTime<Utc>,
    ) {
        let mut data = self.inner.write().await;
        if let Some(existing) = data
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.tmdb_id == tmdb_id)
        {
            existing.score = score;
            existing.rated_at = rated_at;
            return;
        }

        data.ratings.push(Rating {
            user_id: user_id.to_string(),
            tmdb_id,
            score,
            rated_at,
        });
    }
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn find_collaborative_candidates(&self, user_id: &str) -> AppResult<Vec<RawCandidate>> {
        let data = self.inner.read().await;

        let rated: HashSet<MovieId> = data
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.tmdb_id)
            .collect();

        let peers: HashSet<&str> = data
            .ratings
            .iter()
            .filter(|r| r.user_id != user_id && r.score >= LIKED_SCORE && rated.contains(&r.tmdb_id))
            .map(|r| r.user_id.as_str())
            .collect();

        // tmdb_id → (recommenders, score sum); one rating per (user, movie)
        let mut tally: HashMap<MovieId, (i64, i64)> = HashMap::new();
        for rating in data.ratings.iter().filter(|r| {
            peers.contains(r.user_id.as_str())
                && r.score >= LIKED_SCORE
                && !rated.contains(&r.tmdb_id)
        }) {
            let entry = tally.entry(rating.tmdb_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(rating.score);
        }

        let mut candidates: Vec<RawCandidate> = tally
            .into_iter()
            .filter_map(|(tmdb_id, (recommenders, total))| {
                Some(RawCandidate {
                    movie: data.movies.get(&tmdb_id)?.clone(),
                    recommenders,
                    average_score: total as f64 / recommenders as f64,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.recommenders
                .cmp(&a.recommenders)
                .then_with(|| {
                    b.average_score
                        .partial_cmp(&a.average_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.movie.tmdb_id.cmp(&b.movie.tmdb_id))
        });
        candidates.truncate(COLLABORATIVE_LIMIT);

        Ok(candidates)
    }

    async fn find_favorite_movie(&self, user_id: &str) -> AppResult<Option<MovieId>> {
        let data = self.inner.read().await;
        Ok(data
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by(|a, b| a.score.cmp(&b.score).then(a.rated_at.cmp(&b.rated_at)))
            .map(|r| r.tmdb_id))
    }

    async fn find_username(&self, user_id: &str) -> AppResult<Option<String>> {
        let data = self.inner.read().await;
        Ok(data.users.get(user_id).cloned())
    }

    async fn share_exists(
        &self,
        sender_id: &str,
        recipient_username: &str,
        tmdb_id: MovieId,
    ) -> AppResult<bool> {
        let data = self.inner.read().await;
        Ok(data.share_exists(sender_id, recipient_username, tmdb_id))
    }

    async fn create_share(
        &self,
        sender_id: &str,
        recipient_username: &str,
        tmdb_id: MovieId,
        message: Option<String>,
    ) -> AppResult<String> {
        let mut data = self.inner.write().await;

        let recipient_id = match data.user_id_for(recipient_username) {
            Some(id) if data.users.contains_key(sender_id) && data.movies.contains_key(&tmdb_id) => {
                id.to_string()
            }
            _ => {
                return Err(AppError::NotFound(
                    "Could not share recommendation. Make sure the movie and recipient exist."
                        .to_string(),
                ))
            }
        };

        if data.share_exists(sender_id, recipient_username, tmdb_id) {
            return Err(AppError::Conflict(format!(
                "You have already shared this movie with {}",
                recipient_username
            )));
        }

        data.shares.push(ShareEdge {
            from_user_id: sender_id.to_string(),
            to_user_id: recipient_id,
            tmdb_id,
            message,
            shared_at: Utc::now(),
        });

        Ok(recipient_username.to_string())
    }

    async fn list_shares_received_by(&self, user_id: &str) -> AppResult<Vec<ShareRecord>> {
        let data = self.inner.read().await;
        Ok(data.share_records(|edge| edge.to_user_id == user_id))
    }

    async fn list_shares_sent_by(&self, user_id: &str) -> AppResult<Vec<ShareRecord>> {
        let data = self.inner.read().await;
        Ok(data.share_records(|edge| edge.from_user_id == user_id))
    }
}
