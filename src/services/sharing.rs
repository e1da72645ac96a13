use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::GraphStore,
    error::{AppError, AppResult},
    models::{ReceivedShare, SentShare, ShareRequest},
};

/// Peer-to-peer sharing of individual recommendations
pub struct SharingService {
    graph: Arc<dyn GraphStore>,
}

impl SharingService {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    /// Shares a movie from `sender_id` with the user named in `request`
    ///
    /// Rejects self-shares and repeats of the same (sender, recipient, movie)
    /// triple. A missing recipient or movie surfaces as `NotFound`.
    #[instrument(skip(self, request), fields(tmdb_id = request.tmdb_id))]
    pub async fn share(&self, sender_id: &str, request: ShareRequest) -> AppResult<()> {
        let recipient = request.recipient_username.trim();
        if recipient.is_empty() {
            return Err(AppError::BadRequest(
                "recipientUsername is required".to_string(),
            ));
        }
        if request.tmdb_id <= 0 {
            return Err(AppError::BadRequest("tmdbId must be positive".to_string()));
        }

        let sender_username = self
            .graph
            .find_username(sender_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unable to resolve the sending user".to_string()))?;

        if sender_username == recipient {
            return Err(AppError::BadRequest(
                "You cannot share a recommendation with yourself".to_string(),
            ));
        }

        if self
            .graph
            .share_exists(sender_id, recipient, request.tmdb_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "You have already shared this movie with {}",
                recipient
            )));
        }

        let message = request
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let recipient = self
            .graph
            .create_share(sender_id, recipient, request.tmdb_id, message)
            .await?;

        tracing::info!(
            from = %sender_username,
            to = %recipient,
            "Recommendation shared"
        );

        Ok(())
    }

    /// Recommendations shared with `user_id`, newest first
    pub async fn list_received(&self, user_id: &str) -> AppResult<Vec<ReceivedShare>> {
        let records = self.graph.list_shares_received_by(user_id).await?;
        Ok(records.into_iter().map(ReceivedShare::from).collect())
    }

    /// Recommendations `user_id` shared with others, newest first
    pub async fn list_sent(&self, user_id: &str) -> AppResult<Vec<SentShare>> {
        let records = self.graph.list_shares_sent_by(user_id).await?;
        Ok(records.into_iter().map(SentShare::from).collect())
    }
}
