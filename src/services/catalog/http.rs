/// HTTP client for the catalog service
///
/// Endpoints (relative to the configured base URL):
/// 1. `GET /movies/{id}/similar` → similar movie summaries
/// 2. `GET /movies/trending` → trending movie summaries
/// 3. `GET /movies/popular` → popular movie summaries
///
/// Every call is bounded by the client timeout; a timeout is reported like
/// any other transport error. The cache lookup in front of a call gets the
/// same bound and counts as a miss when it runs out.
use crate::{
    cached,
    db::{
        redis::cache::{DISCOVERY_CACHE_TTL, SIMILAR_CACHE_TTL},
        Cache, CacheKey,
    },
    error::{AppError, AppResult},
    models::{Movie, MovieId},
    services::catalog::CatalogClient,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpCatalogClient {
    http_client: HttpClient,
    base_url: String,
    cache: Option<Cache>,
}

impl HttpCatalogClient {
    /// Creates a catalog client whose requests give up after `timeout`
    pub fn new(base_url: &str, timeout: Duration, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: cache.map(|cache| cache.with_op_timeout(timeout)),
        })
    }

    /// Fetches a list of movie summaries from `path`
    async fn get_movies(&self, path: &str) -> AppResult<Vec<Movie>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog returned status {}: {}",
                status, body
            )));
        }

        let movies: Vec<Movie> = response.json().await?;

        tracing::debug!(path = %path, results = movies.len(), "Catalog request completed");

        Ok(movies)
    }

    async fn get_movies_cached(&self, key: CacheKey, ttl: u64, path: &str) -> AppResult<Vec<Movie>> {
        cached!(self.cache.as_ref(), key, ttl, async { self.get_movies(path).await })
    }
}

/// Converts a failed catalog call into an empty list, logging the failure
fn or_empty(result: AppResult<Vec<Movie>>, operation: &'static str) -> Vec<Movie> {
    match result {
        Ok(movies) => movies,
        Err(e) => {
            tracing::warn!(error = %e, operation, "Catalog unavailable, continuing without results");
            Vec::new()
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_similar(&self, tmdb_id: MovieId) -> Vec<Movie> {
        let path = format!("/movies/{}/similar", tmdb_id);
        or_empty(
            self.get_movies_cached(CacheKey::Similar(tmdb_id), SIMILAR_CACHE_TTL, &path)
                .await,
            "similar",
        )
    }

    async fn fetch_trending(&self) -> AppResult<Vec<Movie>> {
        self.get_movies_cached(CacheKey::Trending, DISCOVERY_CACHE_TTL, "/movies/trending")
            .await
    }

    async fn fetch_popular(&self) -> Vec<Movie> {
        or_empty(
            self.get_movies_cached(CacheKey::Popular, DISCOVERY_CACHE_TTL, "/movies/popular")
                .await,
            "popular",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_redis_client, redis::cache::tests::spawn_silent_redis};
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Serves `router` on an ephemeral local port and returns its base URL
    async fn spawn_catalog(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn create_test_client(base_url: &str) -> HttpCatalogClient {
        HttpCatalogClient::new(base_url, Duration::from_millis(200), None).unwrap()
    }

    fn catalog_router() -> Router {
        Router::new()
            .route(
                "/api/movies/:id/similar",
                get(|Path(id): Path<i32>| async move {
                    Json(vec![Movie::new(id + 1, "Sequel"), Movie::new(id + 2, "Prequel")])
                }),
            )
            .route(
                "/api/movies/trending",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/movies/popular",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(vec![Movie::new(1, "Too late")])
                }),
            )
    }

    #[tokio::test]
    async fn test_fetch_similar_success() {
        let base_url = spawn_catalog(catalog_router()).await;
        let client = create_test_client(&base_url);

        let movies = client.fetch_similar(100).await;

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].tmdb_id, 101);
        assert_eq!(movies[1].title, "Prequel");
    }

    #[tokio::test]
    async fn test_fetch_trending_reports_server_error() {
        let base_url = spawn_catalog(catalog_router()).await;
        let client = create_test_client(&base_url);

        let result = client.fetch_trending().await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_fetch_popular_timeout_is_empty() {
        let base_url = spawn_catalog(catalog_router()).await;
        let client = create_test_client(&base_url);

        let started = std::time::Instant::now();
        let movies = client.fetch_popular().await;

        assert!(movies.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_server_error_on_similar_is_empty() {
        let router = Router::new().route(
            "/api/movies/:id/similar",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base_url = spawn_catalog(router).await;
        let client = create_test_client(&base_url);

        assert!(client.fetch_similar(7).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty() {
        let router = Router::new().route(
            "/api/movies/:id/similar",
            get(|| async { "not json" }),
        );
        let base_url = spawn_catalog(router).await;
        let client = create_test_client(&base_url);

        assert!(client.fetch_similar(7).await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_empty() {
        let client = create_test_client("http://127.0.0.1:1/api");

        assert!(client.fetch_similar(7).await.is_empty());
        assert!(client.fetch_popular().await.is_empty());
        assert!(client.fetch_trending().await.is_err());
    }

    #[tokio::test]
    async fn test_stalled_cache_does_not_block_catalog_calls() {
        let base_url = spawn_catalog(catalog_router()).await;
        let redis = create_redis_client(&spawn_silent_redis().await).unwrap();
        let (cache, _writer) = Cache::new(redis, Duration::from_secs(60));
        let client =
            HttpCatalogClient::new(&base_url, Duration::from_millis(200), Some(cache)).unwrap();

        let movies = tokio::time::timeout(Duration::from_secs(5), client.fetch_similar(7))
            .await
            .expect("fetch_similar should not hang on a silent cache");
        assert_eq!(movies.len(), 2);

        let trending = tokio::time::timeout(Duration::from_secs(5), client.fetch_trending())
            .await
            .expect("fetch_trending should not hang on a silent cache");
        assert!(trending.is_err());
    }

    #[tokio::test]
    async fn test_second_similar_call_served_from_cache() {
        // Runs against a real Redis only
        let Ok(redis_url) = std::env::var("REDIS_URL") else {
            return;
        };

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/api/movies/:id/similar",
            get(move |Path(id): Path<i32>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(vec![Movie::new(id + 1, "Sequel")])
                }
            }),
        );
        let base_url = spawn_catalog(router).await;

        let redis = create_redis_client(&redis_url).unwrap();
        let (cache, _writer) = Cache::new(redis.clone(), Duration::from_secs(1));
        let client =
            HttpCatalogClient::new(&base_url, Duration::from_secs(1), Some(cache)).unwrap();

        // Id unlikely to collide with real cached data
        let tmdb_id = 987_654_321;
        let key = CacheKey::Similar(tmdb_id);
        let mut conn = redis.get_multiplexed_async_connection().await.unwrap();
        let _: () = redis::AsyncCommands::del(&mut conn, key.to_string()).await.unwrap();

        let first = client.fetch_similar(tmdb_id).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = client.fetch_similar(tmdb_id).await;

        assert_eq!(first, second);
        assert_eq!(second[0].tmdb_id, tmdb_id + 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _: () = redis::AsyncCommands::del(&mut conn, key.to_string()).await.unwrap();
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = create_test_client("http://catalog.local/api/");
        assert_eq!(client.base_url, "http://catalog.local/api");
    }
}
