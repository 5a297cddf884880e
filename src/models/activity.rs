//! Per-user activity log and message counter models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of message timestamps kept per user.
pub const MESSAGE_HISTORY_CAP: usize = 10_000;

/// One logged user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: String,
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Timestamp of a single counted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageStamp {
    #[serde(with = "super::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Message counter for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCounter {
    /// Lifetime message count, never reduced by history truncation.
    #[serde(default)]
    pub total: u64,
    /// Most recent message timestamps, oldest first.
    #[serde(default)]
    pub messages: Vec<MessageStamp>,
}

impl MessageCounter {
    /// Record one message at `at`, dropping the oldest history past the cap.
    pub fn record(&mut self, at: DateTime<Utc>) {
        self.total += 1;
        self.messages.push(MessageStamp { timestamp: at });
        if self.messages.len() > MESSAGE_HISTORY_CAP {
            let overflow = self.messages.len() - MESSAGE_HISTORY_CAP;
            self.messages.drain(..overflow);
        }
    }

    /// Count messages strictly newer than `cutoff`.
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> u64 {
        self.messages
            .iter()
            .filter(|stamp| stamp.timestamp > cutoff)
            .count() as u64
    }
}

/// A user and how many counted events they have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRank {
    pub user_id: u64,
    pub count: u64,
}

/// Request body for logging a user action.
#[derive(Debug, Clone, Deserialize)]
pub struct AddActivityRequest {
    pub user_id: u64,
    pub action: String,
}

/// Request body for counting a user message.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMessageRequest {
    pub user_id: u64,
}

/// Message count for a user, optionally within a window of days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCountResponse {
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    pub count: u64,
}
