use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, RequestId},
    models::{ReceivedShare, SentShare, ShareRequest},
    routes::AppState,
};

/// Handler for `POST /api/recommendations/share`
pub async fn share(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        tmdb_id = request.tmdb_id,
        recipient = %request.recipient_username,
        "Processing share request"
    );

    state.sharing.share(&user.user_id, request).await?;

    Ok(StatusCode::OK)
}

/// Handler for `GET /api/recommendations/shared/received`
pub async fn received(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ReceivedShare>>> {
    let shares = state.sharing.list_received(&user.user_id).await?;
    Ok(Json(shares))
}

/// Handler for `GET /api/recommendations/shared/sent`
pub async fn sent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<SentShare>>> {
    let shares = state.sharing.list_sent(&user.user_id).await?;
    Ok(Json(shares))
}
