//! Broadcast notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification broadcast to a set of roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub role_ids: Vec<u64>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub role_ids: Vec<u64>,
}
