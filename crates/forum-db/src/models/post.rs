//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub upvoter_ids: Vec<i64>,
    pub downvoter_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostModel {
    /// Net score derived from the persisted vote arrays
    #[inline]
    pub fn score(&self) -> i64 {
        self.upvoter_ids.len() as i64 - self.downvoter_ids.len() as i64
    }
}
