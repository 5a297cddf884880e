//! Message counter API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::{AddMessageRequest, MessageCountResponse, UserRank};
use crate::store::DEFAULT_MESSAGE_LEADERBOARD_LIMIT;
use crate::AppState;

/// Message count query parameters.
#[derive(Debug, Deserialize)]
pub struct MessageCountQuery {
    /// Only count messages from the last `days` days (default: all time).
    #[serde(default)]
    pub days: Option<u32>,
}

/// Message leaderboard query parameters.
#[derive(Debug, Deserialize)]
pub struct MessageLeaderboardQuery {
    /// Number of users to rank (default: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Only count messages from the last `days` days (default: all time).
    #[serde(default)]
    pub days: Option<u32>,
}

fn default_limit() -> usize {
    DEFAULT_MESSAGE_LEADERBOARD_LIMIT
}

/// POST /api/messages - Count one message from a user.
pub async fn count_message(
    State(state): State<AppState>,
    Json(request): Json<AddMessageRequest>,
) -> ApiResult<MessageCountResponse> {
    let total = state.store.add_message(request.user_id).await?;

    success(MessageCountResponse {
        user_id: request.user_id,
        days: None,
        count: total,
    })
}

/// GET /api/messages/:user_id - Message count of a user.
pub async fn get_message_count(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Query(query): Query<MessageCountQuery>,
) -> ApiResult<MessageCountResponse> {
    let count = state
        .store
        .get_user_message_count(user_id, query.days)
        .await;

    success(MessageCountResponse {
        user_id,
        days: query.days,
        count,
    })
}

/// GET /api/leaderboard/messages - Users ranked by message count.
pub async fn message_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<MessageLeaderboardQuery>,
) -> ApiResult<Vec<UserRank>> {
    success(
        state
            .store
            .get_top_active_users_by_messages(query.limit, query.days)
            .await,
    )
}
