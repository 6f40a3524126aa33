use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Assignment,
    Comment,
    Alert,
    Message,
}

/// A one-way, read-tracked message directed at a single user.
///
/// Produced by workflow side effects (task assignment, report request,
/// report submission) or by a manual send. Only the read flag ever changes
/// afterwards; nothing deletes a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub kind: NotificationKind,
    pub to_user_id: String,
    pub from_user_name: Option<String>,
}

impl AppState {
    /// Every fan-out point lands here: mints a fresh id, validates that the
    /// target user exists and prepends so the list stays most-recent-first.
    pub(crate) fn notify(
        &mut self,
        to_user_id: &str,
        title: &str,
        description: String,
        kind: NotificationKind,
        from_user_name: Option<String>,
    ) -> Result<()> {
        if !self.users.iter().any(|u| u.id == to_user_id) {
            return Err(Error::UserNotFound(to_user_id.to_string()));
        }

        let note = Notification {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            created_at: Utc::now(),
            read: false,
            kind,
            to_user_id: to_user_id.to_string(),
            from_user_name,
        };
        debug!("notification for {}: {}", note.to_user_id, note.title);
        self.notifications.insert(0, note);
        Ok(())
    }

    /// Manual send from the session user's inbox compose form.
    pub fn send_notification(&mut self, to_user_id: &str, title: &str, message: &str) -> Result<()> {
        let sender = self.require_user()?.name.clone();
        if title.trim().is_empty() {
            return Err(Error::EmptyField("title"));
        }
        if message.trim().is_empty() {
            return Err(Error::EmptyField("message"));
        }
        self.notify(
            to_user_id,
            title,
            message.to_string(),
            NotificationKind::Message,
            Some(sender),
        )
    }

    /// Flips the read flag of one notification. There is no batch variant.
    pub fn mark_notification_read(&mut self, notification_id: &str) -> Result<()> {
        let note = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| Error::NotificationNotFound(notification_id.to_string()))?;
        note.read = true;
        Ok(())
    }

    pub fn notifications_for(&self, user_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.to_user_id == user_id)
            .collect()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.to_user_id == user_id && !n.read)
            .count()
    }
}
