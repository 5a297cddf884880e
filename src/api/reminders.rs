//! Reminder API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, require_text, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateReminderRequest, Reminder, RoleIdsRequest, UpdateReminderRequest};
use crate::AppState;

fn reminder_not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Reminder {} not found", id))
}

fn found(id: u64, reminder: Option<Reminder>) -> ApiResult<Reminder> {
    match reminder {
        Some(reminder) => success(reminder),
        None => error(reminder_not_found(id)),
    }
}

/// GET /api/reminders - List all reminders.
pub async fn list_reminders(State(state): State<AppState>) -> ApiResult<Vec<Reminder>> {
    success(state.store.get_reminders().await)
}

/// POST /api/reminders - Create a new reminder.
pub async fn create_reminder(
    State(state): State<AppState>,
    Json(request): Json<CreateReminderRequest>,
) -> ApiResult<Reminder> {
    require_text(&request.name, "Name")?;
    require_text(&request.message, "Message")?;
    require_text(&request.time, "Time")?;

    let reminder = state
        .store
        .add_reminder(
            &request.name,
            &request.message,
            &request.time,
            request.is_recurring,
            request.role_id,
        )
        .await?;

    success(reminder)
}

/// GET /api/reminders/:id - Get a single reminder.
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Reminder> {
    found(id, state.store.get_reminder(id).await)
}

/// PATCH /api/reminders/:id - Change a reminder's time, name and/or message.
pub async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateReminderRequest>,
) -> ApiResult<Reminder> {
    if request.time.is_none() && request.name.is_none() && request.message.is_none() {
        return error(AppError::BadRequest("No fields to update".to_string()));
    }

    for (value, field) in [
        (&request.time, "Time"),
        (&request.name, "Name"),
        (&request.message, "Message"),
    ] {
        if let Some(value) = value {
            require_text(value, field)?;
        }
    }

    found(id, state.store.update_reminder_fields(id, &request).await?)
}

/// DELETE /api/reminders/:id - Delete a reminder.
pub async fn delete_reminder(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<()> {
    if state.store.delete_reminder(id).await? {
        success(())
    } else {
        error(reminder_not_found(id))
    }
}

/// POST /api/reminders/:id/toggle - Enable or disable a reminder.
pub async fn toggle_reminder(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Reminder> {
    found(id, state.store.toggle_reminder(id).await?)
}

/// PUT /api/reminders/:id/roles - Replace the roles a reminder pings.
pub async fn replace_reminder_roles(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<RoleIdsRequest>,
) -> ApiResult<Reminder> {
    found(
        id,
        state
            .store
            .update_reminder_roles(id, &request.role_ids)
            .await?,
    )
}

/// POST /api/reminders/:id/roles/add - Add roles to a reminder.
pub async fn add_reminder_roles(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<RoleIdsRequest>,
) -> ApiResult<Reminder> {
    found(
        id,
        state.store.add_reminder_roles(id, &request.role_ids).await?,
    )
}

/// POST /api/reminders/:id/roles/remove - Remove roles from a reminder.
pub async fn remove_reminder_roles(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<RoleIdsRequest>,
) -> ApiResult<Reminder> {
    found(
        id,
        state
            .store
            .remove_reminder_roles(id, &request.role_ids)
            .await?,
    )
}
