use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::Recommendation,
    routes::AppState,
};

/// Handler for `GET /api/recommendations`
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Vec<Recommendation>>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommendations
        .get_recommendations(&user.user_id)
        .await?;

    Ok(Json(recommendations))
}
