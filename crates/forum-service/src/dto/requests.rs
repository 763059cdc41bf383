//! Request DTOs for boundary operations
//!
//! All request DTOs implement `Deserialize`; bodies that carry user text
//! also implement `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use forum_core::traits::{NotificationQuery, ReplyQuery};
use forum_core::VoteDirection;

/// Largest page a listing will serve
const MAX_PAGE_LIMIT: i64 = 100;

// ============================================================================
// Vote Requests
// ============================================================================

/// Apply a toggle-vote to a post or comment
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create a comment on a post, optionally as a reply
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment content must not be empty"))]
    pub content: String,

    /// Parent comment ID when replying
    pub parent_comment_id: Option<String>,
}

/// Pagination parameters for reply listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReplyListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ReplyListParams {
    /// Normalize into a repository query with clamped page size
    pub fn to_query(self) -> ReplyQuery {
        let defaults = ReplyQuery::default();
        ReplyQuery {
            page: self.page.unwrap_or(defaults.page).max(1),
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

// ============================================================================
// Notification Requests
// ============================================================================

/// Pagination and filter parameters for notification listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NotificationListParams {
    pub unread_only: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl NotificationListParams {
    /// Normalize into a repository query with clamped page size
    pub fn to_query(self) -> NotificationQuery {
        let defaults = NotificationQuery::default();
        NotificationQuery {
            unread_only: self.unread_only.unwrap_or(false),
            page: self.page.unwrap_or(defaults.page).max(1),
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_LIMIT),
        }
    }
}
