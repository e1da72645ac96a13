use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;

use recommendation_service::{
    db::InMemoryGraph,
    error::{AppError, AppResult},
    middleware::{auth::Claims, JwtVerifier},
    models::{Movie, MovieId},
    routes::{create_router, AppState},
    services::CatalogClient,
};

const SECRET: &str = "test-secret";

/// Catalog that answers from fixed lists, or fails everything when `down`
struct StubCatalog {
    down: bool,
}

#[async_trait::async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_similar(&self, tmdb_id: MovieId) -> Vec<Movie> {
        if self.down {
            return vec![];
        }
        vec![
            Movie::new(tmdb_id + 1000, "Similar One"),
            Movie::new(2, "Aliens"),
        ]
    }

    async fn fetch_trending(&self) -> AppResult<Vec<Movie>> {
        if self.down {
            return Err(AppError::ExternalApi("catalog down".to_string()));
        }
        Ok(vec![Movie::new(500, "Trending One"), Movie::new(501, "Trending Two")])
    }

    async fn fetch_popular(&self) -> Vec<Movie> {
        vec![]
    }
}

async fn create_test_graph() -> Arc<InMemoryGraph> {
    let graph = InMemoryGraph::new();
    for (id, name) in [("id-a", "A"), ("id-b", "B"), ("id-c", "C"), ("id-new", "newbie")] {
        graph.add_user(id, name).await;
    }
    for (id, title) in [(1, "Alien"), (2, "Aliens"), (3, "Heat"), (42, "Contact")] {
        graph.add_movie(Movie::new(id, title)).await;
    }
    graph.rate("id-a", 1, 5).await;
    graph.rate("id-b", 1, 5).await;
    graph.rate("id-b", 3, 4).await;
    graph.rate("id-c", 1, 4).await;
    graph.rate("id-c", 3, 5).await;
    Arc::new(graph)
}

async fn create_test_server(catalog_down: bool) -> TestServer {
    let state = AppState::new(
        create_test_graph().await,
        Arc::new(StubCatalog { down: catalog_down }),
        JwtVerifier::new(SECRET),
    );
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn bearer(user_id: &str) -> HeaderValue {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(false).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_recommendations_require_auth() {
    let server = create_test_server(false).await;

    let response = server.get("/api/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/recommendations")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recommendations_collaborative_then_similar() {
    let server = create_test_server(false).await;

    let response = server
        .get("/api/recommendations")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    let ids: Vec<i64> = recs.iter().map(|r| r["tmdbId"].as_i64().unwrap()).collect();

    // Heat from similar users first, then catalog movies similar to Alien
    assert_eq!(ids, vec![3, 1001, 2]);
    assert_eq!(recs[0]["reason"], "Popular with similar users");
    assert_eq!(recs[1]["reason"], "Similar to your favorite movie");
}

#[tokio::test]
async fn test_cold_start_user_gets_trending() {
    let server = create_test_server(false).await;

    let response = server
        .get("/api/recommendations")
        .add_header(header::AUTHORIZATION, bearer("id-new"))
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r["reason"] == "Trending now"));
}

#[tokio::test]
async fn test_catalog_outage_returns_empty_list() {
    let server = create_test_server(true).await;

    let response = server
        .get("/api/recommendations")
        .add_header(header::AUTHORIZATION, bearer("id-new"))
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_share_flow() {
    let server = create_test_server(false).await;

    let response = server
        .post("/api/recommendations/share")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .json(&json!({
            "tmdbId": 42,
            "recipientUsername": "B",
            "message": "watch this"
        }))
        .await;
    response.assert_status_ok();

    let response = server
        .post("/api/recommendations/share")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .json(&json!({
            "tmdbId": 42,
            "recipientUsername": "B",
            "message": "again"
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "You have already shared this movie with B");

    let response = server
        .get("/api/recommendations/shared/received")
        .add_header(header::AUTHORIZATION, bearer("id-b"))
        .await;
    response.assert_status_ok();
    let received: Vec<Value> = response.json();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["fromUsername"], "A");
    assert_eq!(received[0]["message"], "watch this");
    assert_eq!(received[0]["title"], "Contact");

    let response = server
        .get("/api/recommendations/shared/sent")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .await;
    response.assert_status_ok();
    let sent: Vec<Value> = response.json();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["toUsername"], "B");
}

#[tokio::test]
async fn test_share_rejections() {
    let server = create_test_server(false).await;

    let response = server
        .post("/api/recommendations/share")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .json(&json!({ "tmdbId": 42, "recipientUsername": "A", "message": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/recommendations/share")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .json(&json!({ "tmdbId": 42, "recipientUsername": "ghost-user" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .post("/api/recommendations/share")
        .add_header(header::AUTHORIZATION, bearer("id-a"))
        .json(&json!({ "recipientUsername": "B" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
