//! Read/share access to the rating graph.
//!
//! Users and movies are nodes; ratings and shared recommendations are edges.
//! Implementations convert their native rows into the typed records below at
//! this boundary so that no store-specific row type leaks into the services.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{MovieId, RawCandidate, ShareRecord},
};

/// Maximum number of collaborative candidates returned per user
pub const COLLABORATIVE_LIMIT: usize = 10;

/// Lowest score that counts as "liked" for collaborative filtering
pub const LIKED_SCORE: i16 = 4;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Movies liked by users who share taste with `user_id`
    ///
    /// Peers are users who rated at least one of the user's movies with a
    /// liked score. Only movies the peers liked and the user has not rated are
    /// returned, ranked by distinct recommenders then average score, at most
    /// [`COLLABORATIVE_LIMIT`]. An empty result is the cold-start signal.
    async fn find_collaborative_candidates(&self, user_id: &str) -> AppResult<Vec<RawCandidate>>;

    /// The user's highest-rated movie, most recent rating winning ties
    async fn find_favorite_movie(&self, user_id: &str) -> AppResult<Option<MovieId>>;

    /// Username currently attached to an identity-provider user id
    async fn find_username(&self, user_id: &str) -> AppResult<Option<String>>;

    async fn share_exists(
        &self,
        sender_id: &str,
        recipient_username: &str,
        tmdb_id: MovieId,
    ) -> AppResult<bool>;

    /// Creates the share edge and returns the recipient's username
    ///
    /// Fails with `NotFound` when the sender, recipient or movie is missing.
    async fn create_share(
        &self,
        sender_id: &str,
        recipient_username: &str,
        tmdb_id: MovieId,
        message: Option<String>,
    ) -> AppResult<String>;

    /// Shares addressed to the user, newest first
    async fn list_shares_received_by(&self, user_id: &str) -> AppResult<Vec<ShareRecord>>;

    /// Shares sent by the user, newest first
    async fn list_shares_sent_by(&self, user_id: &str) -> AppResult<Vec<ShareRecord>>;
}
