use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::GraphStore,
    middleware::{make_span_with_request_id, request_id_middleware, require_auth, JwtVerifier},
    services::{CatalogClient, RecommendationService, SharingService},
};

pub mod recommendations;
pub mod shares;

/// Shared application state
pub struct AppState {
    pub recommendations: RecommendationService,
    pub sharing: SharingService,
    pub jwt: JwtVerifier,
}

impl AppState {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        catalog: Arc<dyn CatalogClient>,
        jwt: JwtVerifier,
    ) -> Self {
        Self {
            recommendations: RecommendationService::new(graph.clone(), catalog),
            sharing: SharingService::new(graph),
            jwt,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/recommendations", recommendation_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Authenticated routes under /api/recommendations
fn recommendation_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(recommendations::list))
        .route("/share", post(shares::share))
        .route("/shared/received", get(shares::received))
        .route("/shared/sent", get(shares::sent))
        .route_layer(from_fn_with_state(state, require_auth))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
