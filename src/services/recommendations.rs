use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::GraphStore,
    error::AppResult,
    models::{Movie, MovieId, Recommendation, RecommendationReason},
    services::catalog::CatalogClient,
};

/// Number of recommendations the cascade tries to reach before falling back
pub const TARGET_RECOMMENDATIONS: usize = 10;

/// Stages of the recommendation cascade, strongest signal first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    /// Movies liked by users with overlapping taste
    Collaborative,
    /// Catalog movies similar to the user's favorite
    SimilaritySeed,
    /// Non-personalized trending list (popular when trending fails)
    ColdStart,
    Done,
}

impl CascadeStage {
    /// Stage that follows `self`, given how many candidates are collected so far
    ///
    /// A full collaborative stage short-circuits the catalog entirely; the
    /// cold-start stage only runs when nothing at all has been collected.
    pub fn next(self, collected: usize) -> CascadeStage {
        match self {
            CascadeStage::Collaborative if collected >= TARGET_RECOMMENDATIONS => {
                CascadeStage::Done
            }
            CascadeStage::Collaborative => CascadeStage::SimilaritySeed,
            CascadeStage::SimilaritySeed if collected == 0 => CascadeStage::ColdStart,
            CascadeStage::SimilaritySeed | CascadeStage::ColdStart | CascadeStage::Done => {
                CascadeStage::Done
            }
        }
    }
}

/// Ordered candidate list, unique by movie id; first reason assigned wins
#[derive(Default)]
struct Candidates {
    items: Vec<Recommendation>,
    seen: HashSet<MovieId>,
}

impl Candidates {
    /// Appends `movies` in order, skipping ids already present; returns how many were added
    fn extend(&mut self, movies: impl IntoIterator<Item = Movie>, reason: RecommendationReason) -> usize {
        let before = self.items.len();
        for movie in movies {
            if self.seen.insert(movie.tmdb_id) {
                self.items.push(Recommendation::from_movie(movie, reason));
            }
        }
        self.items.len() - before
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Builds per-user recommendations from the rating graph and the catalog
///
/// Stateless between requests: each call walks the cascade from the start.
pub struct RecommendationService {
    graph: Arc<dyn GraphStore>,
    catalog: Arc<dyn CatalogClient>,
}

impl RecommendationService {
    pub fn new(graph: Arc<dyn GraphStore>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { graph, catalog }
    }

    /// Recommendations for `user_id`, ordered by signal strength
    ///
    /// Graph failures propagate; catalog failures only shrink the result.
    #[instrument(skip(self))]
    pub async fn get_recommendations(&self, user_id: &str) -> AppResult<Vec<Recommendation>> {
        let mut candidates = Candidates::default();
        let mut stage = CascadeStage::Collaborative;

        loop {
            let added = match stage {
                CascadeStage::Collaborative => self.collaborative(user_id, &mut candidates).await?,
                CascadeStage::SimilaritySeed => {
                    self.similar_to_favorite(user_id, &mut candidates).await?
                }
                CascadeStage::ColdStart => self.cold_start(&mut candidates).await,
                CascadeStage::Done => break,
            };

            tracing::debug!(?stage, added, total = candidates.len(), "Cascade stage finished");
            stage = stage.next(candidates.len());
        }

        tracing::info!(
            user_id = %user_id,
            recommendations = candidates.len(),
            "Recommendations assembled"
        );

        Ok(candidates.items)
    }

    async fn collaborative(&self, user_id: &str, candidates: &mut Candidates) -> AppResult<usize> {
        let raw = self.graph.find_collaborative_candidates(user_id).await?;
        Ok(candidates.extend(
            raw.into_iter().map(|candidate| candidate.movie),
            RecommendationReason::SimilarUsers,
        ))
    }

    async fn similar_to_favorite(
        &self,
        user_id: &str,
        candidates: &mut Candidates,
    ) -> AppResult<usize> {
        let Some(seed) = self.graph.find_favorite_movie(user_id).await? else {
            tracing::debug!(user_id = %user_id, "No favorite movie to seed similarity");
            return Ok(0);
        };

        let similar = self.catalog.fetch_similar(seed).await;
        Ok(candidates.extend(similar, RecommendationReason::SimilarToFavorite))
    }

    async fn cold_start(&self, candidates: &mut Candidates) -> usize {
        let movies = match self.catalog.fetch_trending().await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, "Trending unavailable, falling back to popular");
                self.catalog.fetch_popular().await
            }
        };
        candidates.extend(movies, RecommendationReason::Trending)
    }
}
