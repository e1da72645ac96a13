//! Client abstraction over the external catalog service.
//!
//! The catalog is an unreliable remote dependency. Its failures are contained
//! at this boundary: similar and popular lookups degrade to empty lists, and
//! only trending reports its error so the caller can fall back to popular.

use crate::{
    error::AppResult,
    models::{Movie, MovieId},
};

pub mod http;

pub use http::HttpCatalogClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Movies similar to `tmdb_id`; empty when the catalog cannot answer
    async fn fetch_similar(&self, tmdb_id: MovieId) -> Vec<Movie>;

    /// Currently trending movies
    ///
    /// Errors are returned rather than swallowed so the caller can retry
    /// with [`CatalogClient::fetch_popular`].
    async fn fetch_trending(&self) -> AppResult<Vec<Movie>>;

    /// All-time popular movies; empty when the catalog cannot answer
    async fn fetch_popular(&self) -> Vec<Movie>;
}
