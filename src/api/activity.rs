//! Activity log API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{require_text, success, ApiResult};
use crate::models::{ActivityEntry, AddActivityRequest, UserRank};
use crate::store::{DEFAULT_ACTIVITY_LEADERBOARD_LIMIT, DEFAULT_ACTIVITY_LIMIT};
use crate::AppState;

/// Activity history query parameters.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Number of most recent entries (default: 10).
    #[serde(default = "default_activity_limit")]
    pub limit: usize,
}

fn default_activity_limit() -> usize {
    DEFAULT_ACTIVITY_LIMIT
}

/// Activity leaderboard query parameters.
#[derive(Debug, Deserialize)]
pub struct ActivityLeaderboardQuery {
    /// Number of users to rank (default: 10).
    #[serde(default = "default_leaderboard_limit")]
    pub limit: usize,
}

fn default_leaderboard_limit() -> usize {
    DEFAULT_ACTIVITY_LEADERBOARD_LIMIT
}

/// POST /api/activity - Log a user action.
pub async fn log_activity(
    State(state): State<AppState>,
    Json(request): Json<AddActivityRequest>,
) -> ApiResult<ActivityEntry> {
    require_text(&request.action, "Action")?;

    let entry = state
        .store
        .add_activity(request.user_id, &request.action)
        .await?;

    success(entry)
}

/// GET /api/activity/:user_id - Recent actions of a user, oldest first.
pub async fn get_user_activity(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Vec<ActivityEntry>> {
    success(state.store.get_user_activity(user_id, query.limit).await)
}

/// GET /api/leaderboard/activity - Users ranked by logged actions.
pub async fn activity_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<ActivityLeaderboardQuery>,
) -> ApiResult<Vec<UserRank>> {
    success(state.store.get_top_active_users(query.limit).await)
}
