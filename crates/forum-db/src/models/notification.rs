//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub recipient_id: i64,
    pub sender_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub team_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl NotificationModel {
    /// Check if the record still counts toward the unread badge
    #[inline]
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}
