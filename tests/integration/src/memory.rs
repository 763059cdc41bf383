//! In-memory repository implementations of the core ports
//!
//! Each repository keeps whole entities behind a `tokio::sync::RwLock`
//! and mirrors the query semantics of the PostgreSQL implementations,
//! including reply ordering and the deleted-leaf filter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use forum_core::entities::{Comment, NotificationRecord, Post, Team};
use forum_core::traits::{
    CommentRepository, NotificationQuery, NotificationRepository, PostRepository, RepoResult,
    ReplyQuery, TeamRepository,
};
use forum_core::{DomainError, Snowflake};

// ============================================================================
// Posts
// ============================================================================

/// In-memory `PostRepository`
#[derive(Default)]
pub struct MemoryPostRepository {
    posts: RwLock<HashMap<Snowflake, Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a post; creation is routine CRUD outside this subsystem
    pub async fn insert(&self, post: Post) {
        self.posts.write().await.insert(post.id, post);
    }

    /// Current stored state of a post
    pub async fn get(&self, id: Snowflake) -> Option<Post> {
        self.posts.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn update_votes(&self, post: &Post) -> RepoResult<()> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(DomainError::PostNotFound(post.id)),
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

/// In-memory `CommentRepository`
#[derive(Default)]
pub struct MemoryCommentRepository {
    comments: RwLock<HashMap<Snowflake, Comment>>,
}

impl MemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stored state of a comment
    pub async fn get(&self, id: Snowflake) -> Option<Comment> {
        self.comments.read().await.get(&id).cloned()
    }

    /// Number of stored comments, deleted ones included
    pub async fn len(&self) -> usize {
        self.comments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.comments.read().await.is_empty()
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_votes(&self, comment: &Comment) -> RepoResult<()> {
        let mut comments = self.comments.write().await;
        match comments.get_mut(&comment.id) {
            Some(stored) => {
                *stored = comment.clone();
                Ok(())
            }
            None => Err(DomainError::CommentNotFound(comment.id)),
        }
    }

    async fn soft_delete(&self, comment: &Comment) -> RepoResult<()> {
        let mut comments = self.comments.write().await;
        match comments.get_mut(&comment.id) {
            Some(stored) => {
                *stored = comment.clone();
                Ok(())
            }
            None => Err(DomainError::CommentNotFound(comment.id)),
        }
    }

    async fn find_replies(
        &self,
        parent_id: Snowflake,
        query: ReplyQuery,
    ) -> RepoResult<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut replies: Vec<Comment> = comments
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .filter(|c| !c.is_deleted || has_children(&comments, c.id))
            .cloned()
            .collect();

        // Score descending, then creation time ascending, then id
        replies.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        let offset = query.offset().max(0) as usize;
        let limit = query.limit.clamp(1, 100) as usize;
        Ok(replies.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_replies(&self, parent_id: Snowflake) -> RepoResult<i64> {
        let comments = self.comments.read().await;
        let count = comments
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .filter(|c| !c.is_deleted || has_children(&comments, c.id))
            .count();
        Ok(count as i64)
    }
}

fn has_children(comments: &HashMap<Snowflake, Comment>, id: Snowflake) -> bool {
    comments.values().any(|c| c.parent_id == Some(id))
}

// ============================================================================
// Teams
// ============================================================================

/// In-memory `TeamRepository`
#[derive(Default)]
pub struct MemoryTeamRepository {
    teams: RwLock<HashMap<Snowflake, Team>>,
}

impl MemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a team; creation is routine CRUD outside this subsystem
    pub async fn insert(&self, team: Team) {
        self.teams.write().await.insert(team.id, team);
    }

    /// Current stored state of a team
    pub async fn get(&self, id: Snowflake) -> Option<Team> {
        self.teams.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl TeamRepository for MemoryTeamRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Team>> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn update_members(&self, team: &Team) -> RepoResult<()> {
        let mut teams = self.teams.write().await;
        match teams.get_mut(&team.id) {
            Some(stored) => {
                *stored = team.clone();
                Ok(())
            }
            None => Err(DomainError::TeamNotFound(team.id)),
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// In-memory `NotificationRepository` with a failure toggle for testing
/// the journal's best-effort path
#[derive(Default)]
pub struct MemoryNotificationRepository {
    records: RwLock<HashMap<Snowflake, NotificationRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create` fail, simulating a journal outage
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of journaled records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn create(&self, record: &NotificationRecord) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(
                "journal unavailable".to_string(),
            ));
        }
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<NotificationRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn mark_read(&self, record: &NotificationRecord) -> RepoResult<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(DomainError::NotificationNotFound(record.id)),
        }
    }

    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let mut records = self.records.write().await;
        let mut updated = 0;
        for record in records.values_mut() {
            if record.recipient_id == recipient_id && !record.read {
                record.read = true;
                record.read_at = Some(chrono::Utc::now());
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn find_for_recipient(
        &self,
        recipient_id: Snowflake,
        query: NotificationQuery,
    ) -> RepoResult<Vec<NotificationRecord>> {
        let records = self.records.read().await;
        let mut matches: Vec<NotificationRecord> = records
            .values()
            .filter(|r| r.recipient_id == recipient_id)
            .filter(|r| !query.unread_only || !r.read)
            .cloned()
            .collect();

        // Newest first, id as the tie-break
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.cmp(&a.id))
        });

        let offset = query.offset().max(0) as usize;
        let limit = query.limit.clamp(1, 100) as usize;
        Ok(matches.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_for_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.recipient_id == recipient_id)
            .count() as i64)
    }

    async fn count_unread(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.recipient_id == recipient_id && !r.read)
            .count() as i64)
    }
}
