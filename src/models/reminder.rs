//! Reminder model and its request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled reminder posted to one or more roles.
///
/// `role_ids` is the only role field held in memory. The legacy single
/// `role_id` is derived from it and still written to disk for older readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredReminder", into = "StoredReminder")]
pub struct Reminder {
    pub id: u64,
    pub name: String,
    pub message: String,
    /// Opaque schedule expression, interpreted by the scheduler.
    pub time: String,
    pub is_recurring: bool,
    pub role_ids: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub enabled: bool,
}

impl Reminder {
    /// First target role, kept for callers that only know a single role.
    pub fn role_id(&self) -> Option<u64> {
        self.role_ids.first().copied()
    }
}

/// On-disk shape of a reminder.
#[derive(Serialize, Deserialize)]
struct StoredReminder {
    id: u64,
    name: String,
    message: String,
    time: String,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    role_id: Option<u64>,
    #[serde(default)]
    role_ids: Vec<u64>,
    #[serde(with = "super::timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<StoredReminder> for Reminder {
    fn from(stored: StoredReminder) -> Self {
        let role_ids = match (stored.role_ids.is_empty(), stored.role_id) {
            (true, Some(legacy)) => vec![legacy],
            _ => stored.role_ids,
        };
        Self {
            id: stored.id,
            name: stored.name,
            message: stored.message,
            time: stored.time,
            is_recurring: stored.is_recurring,
            role_ids,
            created_at: stored.created_at,
            enabled: stored.enabled,
        }
    }
}

impl From<Reminder> for StoredReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            role_id: reminder.role_id(),
            name: reminder.name,
            message: reminder.message,
            time: reminder.time,
            is_recurring: reminder.is_recurring,
            role_ids: reminder.role_ids,
            created_at: reminder.created_at,
            enabled: reminder.enabled,
        }
    }
}

/// Request body for creating a new reminder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReminderRequest {
    pub name: String,
    pub message: String,
    pub time: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub role_id: Option<u64>,
}

/// Request body for editing reminder fields. Absent fields are left alone.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReminderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Request body carrying a list of role ids.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleIdsRequest {
    pub role_ids: Vec<u64>,
}
