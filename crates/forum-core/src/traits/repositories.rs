//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs from the durable store; the
//! infrastructure layer provides the implementation. The store is the
//! source of truth for every entity here, so mutations persist whole
//! validated states rather than issuing field-level patches.

use async_trait::async_trait;

use crate::entities::{Comment, NotificationRecord, Post, Team};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// Persist the post's vote sets after a ledger transition
    async fn update_votes(&self, post: &Post) -> RepoResult<()>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// Pagination options for reply listings (1-based page)
#[derive(Debug, Clone, Copy)]
pub struct ReplyQuery {
    pub page: i64,
    pub limit: i64,
}

impl Default for ReplyQuery {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

impl ReplyQuery {
    /// Row offset for this page
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit
    }
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Persist the comment's vote sets after a ledger transition
    async fn update_votes(&self, comment: &Comment) -> RepoResult<()>;

    /// Persist a soft-delete transition (tombstone content, deleted flag)
    async fn soft_delete(&self, comment: &Comment) -> RepoResult<()>;

    /// List children of a parent comment ordered by score descending,
    /// then creation time ascending. Deleted children are included only
    /// while they still anchor descendants.
    async fn find_replies(&self, parent_id: Snowflake, query: ReplyQuery)
        -> RepoResult<Vec<Comment>>;

    /// Count the children a reply listing can page over
    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Team Repository
// ============================================================================

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Find team by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Team>>;

    /// Persist the team's member list after a registry transition
    async fn update_members(&self, team: &Team) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

/// Pagination options for notification listings (1-based page)
#[derive(Debug, Clone, Copy)]
pub struct NotificationQuery {
    pub unread_only: bool,
    pub page: i64,
    pub limit: i64,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            unread_only: false,
            page: 1,
            limit: 20,
        }
    }
}

impl NotificationQuery {
    /// Row offset for this page
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit
    }
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification record
    async fn create(&self, record: &NotificationRecord) -> RepoResult<()>;

    /// Find notification by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<NotificationRecord>>;

    /// Persist a mark-read transition
    async fn mark_read(&self, record: &NotificationRecord) -> RepoResult<()>;

    /// Mark every unread record for a recipient; returns rows affected
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64>;

    /// List records for a recipient, newest first
    async fn find_for_recipient(
        &self,
        recipient_id: Snowflake,
        query: NotificationQuery,
    ) -> RepoResult<Vec<NotificationRecord>>;

    /// Total records for a recipient
    async fn count_for_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64>;

    /// Unread records for a recipient (badge count)
    async fn count_unread(&self, recipient_id: Snowflake) -> RepoResult<i64>;
}
