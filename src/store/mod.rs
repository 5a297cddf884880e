//! JSON record store.
//!
//! The whole document lives in memory behind one lock and is rewritten to
//! disk after every mutation. A mutation is applied to a scratch copy first;
//! the copy replaces the live document only once it has been flushed, so a
//! failed write leaves memory exactly as it was on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{
    ActivityEntry, Document, Notification, Reminder, UpdateReminderRequest, UserRank,
};

/// Default number of entries returned by [`RecordStore::get_user_activity`].
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;
/// Default size of the activity leaderboard.
pub const DEFAULT_ACTIVITY_LEADERBOARD_LIMIT: usize = 10;
/// Default size of the message leaderboard.
pub const DEFAULT_MESSAGE_LEADERBOARD_LIMIT: usize = 100;

/// File-backed store for reminders, activity, notifications and message counts.
pub struct RecordStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl RecordStore {
    /// Open the store at `path`, creating its parent directory if needed.
    ///
    /// A missing, unreadable or corrupted file yields an empty document.
    /// Corrupted files are copied aside before they get overwritten.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        ensure_parent_dir(&path).await?;

        let document = load_document(&path).await;

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Snapshot of the full in-memory document.
    #[cfg(test)]
    pub async fn document(&self) -> Document {
        self.document.lock().await.clone()
    }

    // ==================== REMINDER OPERATIONS ====================

    /// Create a reminder. It starts enabled.
    pub async fn add_reminder(
        &self,
        name: &str,
        message: &str,
        time: &str,
        is_recurring: bool,
        role_id: Option<u64>,
    ) -> Result<Reminder, AppError> {
        let reminder = self
            .mutate(|doc| {
                let reminder = Reminder {
                    id: doc.next_reminder_id(),
                    name: name.to_string(),
                    message: message.to_string(),
                    time: time.to_string(),
                    is_recurring,
                    role_ids: role_id.into_iter().collect(),
                    created_at: Utc::now(),
                    enabled: true,
                };
                doc.reminders.push(reminder.clone());
                reminder
            })
            .await?;

        tracing::info!("Created reminder {} ({})", reminder.id, reminder.name);
        Ok(reminder)
    }

    /// List all reminders in insertion order.
    pub async fn get_reminders(&self) -> Vec<Reminder> {
        self.document.lock().await.reminders.clone()
    }

    /// Get a reminder by ID.
    pub async fn get_reminder(&self, id: u64) -> Option<Reminder> {
        self.document
            .lock()
            .await
            .reminders
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Delete a reminder. Returns whether anything was removed.
    pub async fn delete_reminder(&self, id: u64) -> Result<bool, AppError> {
        let mut document = self.document.lock().await;
        if !document.reminders.iter().any(|r| r.id == id) {
            return Ok(false);
        }

        let mut scratch = document.clone();
        scratch.reminders.retain(|r| r.id != id);
        self.flush(&scratch).await?;
        *document = scratch;

        tracing::info!("Deleted reminder {}", id);
        Ok(true)
    }

    /// Flip the enabled flag.
    pub async fn toggle_reminder(&self, id: u64) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| r.enabled = !r.enabled).await
    }

    /// Per-field edit. The HTTP surface uses [`Self::update_reminder_fields`].
    #[allow(dead_code)]
    pub async fn update_reminder_time(
        &self,
        id: u64,
        time: &str,
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| r.time = time.to_string()).await
    }

    #[allow(dead_code)]
    pub async fn update_reminder_name(
        &self,
        id: u64,
        name: &str,
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| r.name = name.to_string()).await
    }

    #[allow(dead_code)]
    pub async fn update_reminder_message(
        &self,
        id: u64,
        message: &str,
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| r.message = message.to_string()).await
    }

    /// Apply every field present in `request` with a single write.
    pub async fn update_reminder_fields(
        &self,
        id: u64,
        request: &UpdateReminderRequest,
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| {
            if let Some(time) = &request.time {
                r.time = time.clone();
            }
            if let Some(name) = &request.name {
                r.name = name.clone();
            }
            if let Some(message) = &request.message {
                r.message = message.clone();
            }
        })
        .await
    }

    /// Replace the full list of target roles.
    pub async fn update_reminder_roles(
        &self,
        id: u64,
        role_ids: &[u64],
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| r.role_ids = role_ids.to_vec()).await
    }

    /// Append roles not already targeted, keeping first-seen order.
    pub async fn add_reminder_roles(
        &self,
        id: u64,
        new_role_ids: &[u64],
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| {
            for role in new_role_ids {
                if !r.role_ids.contains(role) {
                    r.role_ids.push(*role);
                }
            }
        })
        .await
    }

    /// Stop targeting the given roles.
    pub async fn remove_reminder_roles(
        &self,
        id: u64,
        remove_role_ids: &[u64],
    ) -> Result<Option<Reminder>, AppError> {
        self.update_reminder(id, |r| {
            r.role_ids.retain(|role| !remove_role_ids.contains(role))
        })
        .await
    }

    /// Apply `edit` to one reminder and persist. Nothing is written when the
    /// reminder does not exist.
    async fn update_reminder<F>(&self, id: u64, edit: F) -> Result<Option<Reminder>, AppError>
    where
        F: FnOnce(&mut Reminder),
    {
        let mut document = self.document.lock().await;
        let mut scratch = document.clone();
        let updated = match scratch.reminder_mut(id) {
            Some(reminder) => {
                edit(reminder);
                reminder.clone()
            }
            None => return Ok(None),
        };
        self.flush(&scratch).await?;
        *document = scratch;

        tracing::debug!("Updated reminder {}", id);
        Ok(Some(updated))
    }

    // ==================== ACTIVITY OPERATIONS ====================

    /// Append an action to a user's activity log.
    pub async fn add_activity(
        &self,
        user_id: u64,
        action: &str,
    ) -> Result<ActivityEntry, AppError> {
        self.mutate(|doc| {
            let entry = ActivityEntry {
                action: action.to_string(),
                timestamp: Utc::now(),
            };
            doc.activity.entry(user_id).or_default().push(entry.clone());
            entry
        })
        .await
    }

    /// The most recent `limit` actions of a user, oldest first.
    pub async fn get_user_activity(&self, user_id: u64, limit: usize) -> Vec<ActivityEntry> {
        let document = self.document.lock().await;
        match document.activity.get(&user_id) {
            Some(entries) => entries[entries.len().saturating_sub(limit)..].to_vec(),
            None => Vec::new(),
        }
    }

    /// Users ranked by number of logged actions.
    pub async fn get_top_active_users(&self, limit: usize) -> Vec<UserRank> {
        let document = self.document.lock().await;
        let counts = document
            .activity
            .iter()
            .map(|(user_id, entries)| (*user_id, entries.len() as u64));
        rank_users(counts, limit)
    }

    // ==================== MESSAGE COUNT OPERATIONS ====================

    /// Count one message from a user. Returns the user's new total.
    pub async fn add_message(&self, user_id: u64) -> Result<u64, AppError> {
        self.mutate(|doc| {
            let counter = doc.message_count.entry(user_id).or_default();
            counter.record(Utc::now());
            counter.total
        })
        .await
    }

    /// Lifetime message total, or messages within the last `days` days.
    pub async fn get_user_message_count(&self, user_id: u64, days: Option<u32>) -> u64 {
        let document = self.document.lock().await;
        let Some(counter) = document.message_count.get(&user_id) else {
            return 0;
        };

        match days {
            None => counter.total,
            Some(days) => counter.count_since(window_start(Utc::now(), days)),
        }
    }

    /// Users ranked by message count, skipping users with no messages in range.
    pub async fn get_top_active_users_by_messages(
        &self,
        limit: usize,
        days: Option<u32>,
    ) -> Vec<UserRank> {
        let document = self.document.lock().await;
        let cutoff = days.map(|days| window_start(Utc::now(), days));

        let counts = document
            .message_count
            .iter()
            .map(|(user_id, counter)| {
                let count = match cutoff {
                    None => counter.total,
                    Some(cutoff) => counter.count_since(cutoff),
                };
                (*user_id, count)
            })
            .filter(|(_, count)| *count > 0);
        rank_users(counts, limit)
    }

    // ==================== NOTIFICATION OPERATIONS ====================

    /// Record a broadcast notification.
    pub async fn add_notification(
        &self,
        title: &str,
        message: &str,
        role_ids: &[u64],
    ) -> Result<Notification, AppError> {
        let notification = self
            .mutate(|doc| {
                let notification = Notification {
                    id: doc.next_notification_id(),
                    title: title.to_string(),
                    message: message.to_string(),
                    role_ids: role_ids.to_vec(),
                    created_at: Utc::now(),
                };
                doc.notifications.push(notification.clone());
                notification
            })
            .await?;

        tracing::info!("Created notification {}", notification.id);
        Ok(notification)
    }

    /// List all notifications in insertion order.
    pub async fn get_notifications(&self) -> Vec<Notification> {
        self.document.lock().await.notifications.clone()
    }

    // ==================== PERSISTENCE ====================

    /// Apply `apply` to a copy of the document, flush it, then make it live.
    async fn mutate<T, F>(&self, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Document) -> T,
    {
        let mut document = self.document.lock().await;
        let mut scratch = document.clone();
        let result = apply(&mut scratch);
        self.flush(&scratch).await?;
        *document = scratch;
        Ok(result)
    }

    /// Write the document to a temp file and rename it over the store file.
    async fn flush(&self, document: &Document) -> Result<(), AppError> {
        ensure_parent_dir(&self.path).await?;

        let temp_path = sibling_path(&self.path, "tmp");
        let json = serde_json::to_vec_pretty(document)?;

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Read the store file, falling back to an empty document on any failure.
async fn load_document(path: &Path) -> Document {
    let contents = match fs::read(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No record file at {:?}, starting empty", path);
            return Document::default();
        }
        Err(e) => {
            tracing::warn!("Record file {:?} is unreadable ({}), starting empty", path, e);
            return Document::default();
        }
    };

    match serde_json::from_slice::<Document>(&contents) {
        Ok(document) => {
            tracing::info!(
                "Loaded {} reminders, {} notifications, {} active users from {:?}",
                document.reminders.len(),
                document.notifications.len(),
                document.activity.len(),
                path
            );
            document
        }
        Err(e) => {
            tracing::warn!("Record file {:?} is corrupted: {}", path, e);
            let backup_path = sibling_path(
                path,
                &format!("corrupt.{}", Utc::now().format("%Y%m%d_%H%M%S")),
            );
            match fs::copy(path, &backup_path).await {
                Ok(_) => tracing::warn!(
                    "Corrupted record file backed up to {:?}, starting empty",
                    backup_path
                ),
                Err(backup_err) => {
                    tracing::error!("Failed to back up corrupted record file: {}", backup_err)
                }
            }
            Document::default()
        }
    }
}

/// `path` with `.suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Start of a window covering the last `days` days.
fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Sort by count descending, ties by ascending user id, and keep `limit`.
fn rank_users(counts: impl Iterator<Item = (u64, u64)>, limit: usize) -> Vec<UserRank> {
    let mut ranks: Vec<UserRank> = counts
        .map(|(user_id, count)| UserRank { user_id, count })
        .collect();
    ranks.sort_by(|a, b| b.count.cmp(&a.count).then(a.user_id.cmp(&b.user_id)));
    ranks.truncate(limit);
    ranks
}
