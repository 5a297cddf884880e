//! The root record document persisted as a single JSON file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ActivityEntry, MessageCounter, Notification, Reminder};

/// All bot records. Written to disk as one pretty-printed JSON object.
///
/// Per-user maps are keyed by user id; on disk the keys are decimal strings.
/// Any collection missing from an older file starts out empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub activity: BTreeMap<u64, Vec<ActivityEntry>>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub message_count: BTreeMap<u64, MessageCounter>,
}

impl Document {
    /// Id for the next reminder.
    pub fn next_reminder_id(&self) -> u64 {
        next_id(self.reminders.len(), self.reminders.iter().map(|r| r.id))
    }

    /// Id for the next notification.
    pub fn next_notification_id(&self) -> u64 {
        next_id(
            self.notifications.len(),
            self.notifications.iter().map(|n| n.id),
        )
    }

    pub fn reminder_mut(&mut self, id: u64) -> Option<&mut Reminder> {
        self.reminders.iter_mut().find(|r| r.id == id)
    }
}

/// `count + 1`, bumped past the largest live id. Only a deleted highest id
/// can come back.
fn next_id(count: usize, ids: impl Iterator<Item = u64>) -> u64 {
    ids.fold(count as u64, u64::max) + 1
}
