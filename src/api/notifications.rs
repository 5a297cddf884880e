//! Notification API endpoints.

use axum::{extract::State, Json};

use super::{require_text, success, ApiResult};
use crate::models::{CreateNotificationRequest, Notification};
use crate::AppState;

/// GET /api/notifications - List all notifications.
pub async fn list_notifications(State(state): State<AppState>) -> ApiResult<Vec<Notification>> {
    success(state.store.get_notifications().await)
}

/// POST /api/notifications - Post a notification to a set of roles.
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> ApiResult<Notification> {
    require_text(&request.title, "Title")?;
    require_text(&request.message, "Message")?;

    let notification = state
        .store
        .add_notification(&request.title, &request.message, &request.role_ids)
        .await?;

    success(notification)
}
