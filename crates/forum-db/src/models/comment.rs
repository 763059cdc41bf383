//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub parent_comment_id: Option<i64>,
    pub content: String,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub upvoter_ids: Vec<i64>,
    pub downvoter_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentModel {
    /// Check if comment is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    /// Net score derived from the persisted vote arrays
    #[inline]
    pub fn score(&self) -> i64 {
        self.upvoter_ids.len() as i64 - self.downvoter_ids.len() as i64
    }
}
